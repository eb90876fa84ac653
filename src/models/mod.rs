//! Curve family implementation.
//!
//! The model is implemented as small, pure functions so that fitting/search code
//! can stay generic over how the parameters are produced.

pub mod model;

pub use model::*;
