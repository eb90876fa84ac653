//! Curve fitting engine.
//!
//! Responsibilities:
//!
//! - pair observed points with curve samples by x-rank (`correspondence`)
//! - score a pairing (`objective`)
//! - search the bounded parameter box: differential evolution (`evolution`)
//!   followed by Nelder–Mead polish (`polish`), composed in `search`
//! - validate inputs and assemble the `FitResult` (`fitter`)

pub mod correspondence;
pub mod evolution;
pub mod fitter;
pub mod objective;
pub mod polish;
pub mod search;

pub use correspondence::*;
pub use evolution::*;
pub use fitter::*;
pub use objective::*;
pub use polish::*;
pub use search::*;
