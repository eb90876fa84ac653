//! Mathematical utilities: evenly spaced grids and stable orderings.

pub mod order;
pub mod spacing;

pub use order::*;
pub use spacing::*;
