//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw tabular inputs (`RawValue`, `RawRecord`, `RawTable`, `JoinedObservation`)
//! - the normalized `FeatureVector` and its positional contract (`FEATURE_ORDER`)
//! - cost bands, thresholds and assembler configuration

pub mod types;

pub use types::*;
