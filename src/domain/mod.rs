//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observed and sampled points (`Point`)
//! - the shape parameters being fit (`CurveParams`) and their `ParamBounds`
//! - fixed curve constants (`CurveConfig`) and search knobs (`SearchConfig`)
//! - fit outputs (`FitResult`, `PairResidual`, `CurveFile`)

pub mod types;

pub use types::*;
