//! Synthetic point clouds for demos and round-trip checks.

pub mod sample;

pub use sample::*;
