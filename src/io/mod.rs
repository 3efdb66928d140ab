//! Input/output helpers.
//!
//! - CSV ingest with column type inference (`ingest`)
//! - training table CSV export (`export`)
//! - model metadata JSON read/write (`meta`)

pub mod export;
pub mod ingest;
pub mod meta;

pub use export::*;
pub use ingest::*;
pub use meta::*;
