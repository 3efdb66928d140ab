//! Heuristic routing cost: the training label for the downstream regressor.
//!
//! The cost ranks route alternatives; it never hard-blocks a road. Changing any
//! weight changes the training target, so weights carry a version tag that is
//! written into the exported model metadata.

use serde::Serialize;

use crate::domain::{FLOOD_DEPTH_RANGE, FeatureVector, RAINFALL_RANGE, RoadPriority};

/// Weight set for [`compute_routing_cost`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostWeights {
    pub version: &'static str,
    pub base: f64,
    /// Penalty for low and no-info roads.
    pub road_low: f64,
    pub road_medium: f64,
    pub road_high: f64,
    pub bridge: f64,
    /// Per meter of flood depth, only while raining.
    pub flood_depth: f64,
    /// Per millimeter of rainfall, only while raining over mapped flood depth.
    pub rainfall: f64,
}

impl CostWeights {
    pub const CALIBRATED: CostWeights = CostWeights {
        version: "calibrated-v2",
        base: 1.0,
        road_low: 0.8,
        road_medium: 0.4,
        road_high: 0.0,
        bridge: 0.5,
        flood_depth: 1.5,
        rainfall: 0.1,
    };

    fn road_penalty(&self, priority: RoadPriority) -> f64 {
        match priority {
            RoadPriority::NoInfo | RoadPriority::Low => self.road_low,
            RoadPriority::Medium => self.road_medium,
            RoadPriority::High => self.road_high,
        }
    }
}

impl Default for CostWeights {
    fn default() -> Self {
        Self::CALIBRATED
    }
}

/// Routing cost for one feature vector.
///
/// Weather only contributes while raining, and rainfall only counts where the
/// flood depth is non-zero: without mapped flood depth, heavy rain alone must
/// not mark a road as high risk.
pub fn compute_routing_cost(features: &FeatureVector, weights: &CostWeights) -> f64 {
    let mut cost = weights.base + weights.road_penalty(features.road_priority);

    if features.bridge {
        cost += weights.bridge;
    }

    if features.is_raining {
        let depth = clamp_finite(features.flood_depth_5yr, FLOOD_DEPTH_RANGE);
        let rain = clamp_finite(features.rainfall_mm, RAINFALL_RANGE);
        if depth > 0.0 {
            cost += depth * weights.flood_depth;
            cost += rain * weights.rainfall;
        }
    }

    cost
}

/// [`compute_routing_cost`] with the calibrated weights.
pub fn routing_cost(features: &FeatureVector) -> f64 {
    compute_routing_cost(features, &CostWeights::CALIBRATED)
}

// Vectors built by hand may skip normalization; NaN counts as zero.
fn clamp_finite(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}
