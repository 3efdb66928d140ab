//! Field normalizer: raw scalars to clean numeric primitives.
//!
//! Every function here is total. Missing fields, garbage text and out-of-range
//! numbers all degrade to a defined value; nothing is rejected and no row is
//! dropped.

use crate::domain::{FLOOD_DEPTH_RANGE, RAINFALL_RANGE, RawValue};

/// Text values accepted as a true `bridge` flag (after trim + lower-case).
const BRIDGE_TRUE_TOKENS: [&str; 3] = ["yes", "true", "1"];

/// Historical 5-year flood depth, clamped to `[0.0, 3.0]`.
pub fn normalize_flood_depth(value: &RawValue) -> f64 {
    clamp_continuous(value, FLOOD_DEPTH_RANGE)
}

/// Rainfall in millimeters, clamped to `[0.0, 200.0]`.
pub fn normalize_rainfall(value: &RawValue) -> f64 {
    clamp_continuous(value, RAINFALL_RANGE)
}

/// Any non-zero number (negative included) is raining.
pub fn normalize_is_raining(value: &RawValue) -> bool {
    match value {
        RawValue::Bool(b) => *b,
        other => other.as_number().is_some_and(|n| n != 0.0),
    }
}

/// Text goes through the yes/true/1 token map; numbers are non-zero checks.
pub fn normalize_bridge(value: &RawValue) -> bool {
    match value {
        RawValue::Missing => false,
        RawValue::Bool(b) => *b,
        RawValue::Number(n) => !n.is_nan() && *n != 0.0,
        RawValue::Text(s) => {
            let token = s.trim().to_ascii_lowercase();
            BRIDGE_TRUE_TOKENS.contains(&token.as_str())
        }
    }
}

fn clamp_continuous(value: &RawValue, (lo, hi): (f64, f64)) -> f64 {
    value.as_number().unwrap_or(0.0).clamp(lo, hi)
}
