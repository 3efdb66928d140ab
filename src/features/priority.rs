//! Road priority encoder: free-text highway classification to an ordinal code.

use crate::domain::{RawValue, RoadPriority};

const HIGH_PRIORITY_TYPES: [&str; 2] = ["trunk", "primary"];
const MEDIUM_PRIORITY_TYPES: [&str; 2] = ["secondary", "tertiary"];

/// Encode a highway classification.
///
/// Blank input is `NoInfo`. Unknown non-blank classifications are `Low`, so a
/// road we know exists but cannot classify still ranks above "no info".
pub fn encode_road_priority(road_type: Option<&str>) -> RoadPriority {
    let Some(road_type) = road_type.map(str::trim).filter(|s| !s.is_empty()) else {
        return RoadPriority::NoInfo;
    };
    let road_type = road_type.to_ascii_lowercase();
    if HIGH_PRIORITY_TYPES.contains(&road_type.as_str()) {
        RoadPriority::High
    } else if MEDIUM_PRIORITY_TYPES.contains(&road_type.as_str()) {
        RoadPriority::Medium
    } else {
        RoadPriority::Low
    }
}

/// Encode a raw `type` cell. Only text is classified.
pub fn encode_raw_road_type(value: &RawValue) -> RoadPriority {
    match value {
        RawValue::Text(s) => encode_road_priority(Some(s.as_str())),
        _ => RoadPriority::NoInfo,
    }
}

/// Re-read an already encoded `road_priority` cell.
///
/// Numbers are truncated toward zero and clamped into `0..=3`; anything
/// unparsable is `NoInfo`.
pub fn decode_road_priority(value: &RawValue) -> RoadPriority {
    match value.as_number() {
        Some(n) if n.is_finite() => RoadPriority::from_code(n.trunc() as i64),
        Some(n) if n > 0.0 => RoadPriority::High,
        _ => RoadPriority::NoInfo,
    }
}
