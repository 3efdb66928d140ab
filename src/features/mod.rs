//! Feature engineering: raw fields to the canonical feature vector.
//!
//! - per-field coercion + clamping (`normalize`)
//! - highway classification encoding (`priority`)
//! - record/batch vector building (`vector`)

pub mod normalize;
pub mod priority;
pub mod vector;

pub use normalize::*;
pub use priority::*;
pub use vector::*;
