//! `spiral-curves` library crate.
//!
//! The binary (`spiral`) is a thin wrapper around this library so that:
//!
//! - the fitting engine (`models`, `fit`) is testable without spawning processes
//! - I/O, reporting and plotting stay outside the engine
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
