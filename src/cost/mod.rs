//! Routing cost label and its interpretation bands.
//!
//! Both are small, pure functions over a `FeatureVector` so the dataset
//! assembler can map them over rows in any order (or in parallel).

pub mod bands;
pub mod routing;

pub use bands::*;
pub use routing::*;
