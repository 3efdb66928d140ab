//! `routing-risk` library crate.
//!
//! The binary (`routing-risk`) is a thin wrapper around this library so that:
//!
//! - the feature/cost engine is testable without spawning processes
//! - an inference service can reuse the exact normalization used for training
//! - the `build` workflow stays separate from argument parsing

pub mod app;
pub mod cli;
pub mod cost;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod report;
