//! Feature vector builder.
//!
//! Composes the field normalizer and the road priority encoder into the
//! canonical five-field vector. Unrelated columns are never read, so they cannot
//! leak into the output.

use crate::domain::{
    BRIDGE, FLOOD_DEPTH_5YR, FeatureVector, FieldSource, IS_RAINING, RAINFALL_MM, ROAD_PRIORITY, ROAD_TYPE,
    RoadPriority,
};
use crate::features::normalize::{normalize_bridge, normalize_flood_depth, normalize_is_raining, normalize_rainfall};
use crate::features::priority::{decode_road_priority, encode_raw_road_type};

/// Build the feature vector for a single record.
pub fn build_feature_vector<S: FieldSource + ?Sized>(source: &S) -> FeatureVector {
    FeatureVector {
        flood_depth_5yr: normalize_flood_depth(source.field(FLOOD_DEPTH_5YR)),
        rainfall_mm: normalize_rainfall(source.field(RAINFALL_MM)),
        is_raining: normalize_is_raining(source.field(IS_RAINING)),
        bridge: normalize_bridge(source.field(BRIDGE)),
        road_priority: resolve_road_priority(source),
    }
}

/// Build one vector per input row, preserving row order.
pub fn build_feature_table<S: FieldSource>(sources: &[S]) -> Vec<FeatureVector> {
    sources.iter().map(build_feature_vector).collect()
}

// A raw `type` wins over a pre-encoded `road_priority` column.
fn resolve_road_priority<S: FieldSource + ?Sized>(source: &S) -> RoadPriority {
    let road_type = source.field(ROAD_TYPE);
    if !road_type.is_missing() {
        return encode_raw_road_type(road_type);
    }
    decode_road_priority(source.field(ROAD_PRIORITY))
}
