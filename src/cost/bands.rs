//! Risk / speed classification of routing costs, plus analysis-only labels.
//!
//! None of these outputs feed back into training; they exist for UI hints and
//! for eyeballing a generated dataset.

use crate::domain::{AnalysisLabels, FeatureVector, RiskBand, RiskThresholds, SpeedBand, SpeedThresholds};

/// Cost above which a road is labelled impassable in `passable_cost5`.
pub const PASSABLE_COST_MAX: f64 = 5.0;

/// Upper bound applied to thresholds read from external metadata.
const THRESHOLD_MAX: f64 = 999.0;

pub fn classify_risk(cost: f64, thresholds: &RiskThresholds) -> RiskBand {
    if cost < thresholds.low_lt {
        RiskBand::Low
    } else if cost <= thresholds.medium_le {
        RiskBand::Medium
    } else {
        RiskBand::High
    }
}

pub fn classify_speed(cost: f64, thresholds: &SpeedThresholds) -> SpeedBand {
    if cost < thresholds.normal_lt {
        SpeedBand::Normal
    } else if cost < thresholds.caution_lt {
        SpeedBand::Caution
    } else if cost < thresholds.slow_lt {
        SpeedBand::Slow
    } else {
        SpeedBand::Extreme
    }
}

/// Conservative passability rule on normalized weather values.
///
/// Deliberately independent of `is_raining`: it looks at the recorded rainfall
/// and mapped flood depth only.
pub fn passable_rule(features: &FeatureVector) -> bool {
    let rain = features.rainfall_mm;
    let depth = features.flood_depth_5yr;
    !((rain > 30.0 && depth > 0.3) || (rain > 10.0 && depth > 0.5))
}

pub fn passable_by_cost(cost: f64) -> bool {
    cost <= PASSABLE_COST_MAX
}

/// All analysis labels for one row.
pub fn analysis_labels(
    features: &FeatureVector,
    cost: f64,
    risk: &RiskThresholds,
    speed: &SpeedThresholds,
) -> AnalysisLabels {
    AnalysisLabels {
        risk_band: classify_risk(cost, risk),
        speed_band: classify_speed(cost, speed),
        passable_rule: passable_rule(features),
        passable_cost5: passable_by_cost(cost),
    }
}

impl RiskThresholds {
    /// Clamp into `[0, 999]` and keep `medium_le >= low_lt`.
    pub fn sanitized(self) -> Self {
        let low_lt = sanitize(self.low_lt, RiskThresholds::default().low_lt);
        let medium_le = sanitize(self.medium_le, RiskThresholds::default().medium_le).max(low_lt);
        Self { low_lt, medium_le }
    }
}

impl SpeedThresholds {
    /// Clamp into `[0, 999]` and keep the cut-offs non-decreasing.
    pub fn sanitized(self) -> Self {
        let defaults = SpeedThresholds::default();
        let normal_lt = sanitize(self.normal_lt, defaults.normal_lt);
        let caution_lt = sanitize(self.caution_lt, defaults.caution_lt).max(normal_lt);
        let slow_lt = sanitize(self.slow_lt, defaults.slow_lt).max(caution_lt);
        Self {
            normal_lt,
            caution_lt,
            slow_lt,
        }
    }
}

fn sanitize(value: f64, fallback: f64) -> f64 {
    let value = if value.is_finite() { value } else { fallback };
    value.clamp(0.0, THRESHOLD_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoadPriority;

    #[test]
    fn risk_boundaries() {
        let t = RiskThresholds::default();
        assert_eq!(classify_risk(1.0, &t), RiskBand::Low);
        assert_eq!(classify_risk(2.4999, &t), RiskBand::Low);
        assert_eq!(classify_risk(2.5, &t), RiskBand::Medium);
        assert_eq!(classify_risk(5.0, &t), RiskBand::Medium);
        assert_eq!(classify_risk(5.0001, &t), RiskBand::High);
        assert_eq!(classify_risk(8.0, &t), RiskBand::High);
    }

    #[test]
    fn speed_boundaries() {
        let t = SpeedThresholds::default();
        assert_eq!(classify_speed(2.4999, &t), SpeedBand::Normal);
        assert_eq!(classify_speed(2.5, &t), SpeedBand::Caution);
        assert_eq!(classify_speed(4.9999, &t), SpeedBand::Caution);
        assert_eq!(classify_speed(5.0, &t), SpeedBand::Slow);
        assert_eq!(classify_speed(6.9999, &t), SpeedBand::Slow);
        assert_eq!(classify_speed(7.0, &t), SpeedBand::Extreme);
        assert_eq!(classify_speed(8.0, &t), SpeedBand::Extreme);
    }

    #[test]
    fn cost_five_is_medium_risk_but_slow_speed() {
        assert_eq!(classify_risk(5.0, &RiskThresholds::default()), RiskBand::Medium);
        assert_eq!(classify_speed(5.0, &SpeedThresholds::default()), SpeedBand::Slow);
        assert!(passable_by_cost(5.0));
        assert!(!passable_by_cost(5.01));
    }

    #[test]
    fn recommended_speeds() {
        let kph: Vec<u32> = [SpeedBand::Normal, SpeedBand::Caution, SpeedBand::Slow, SpeedBand::Extreme]
            .iter()
            .map(|b| b.recommended_speed_kph())
            .collect();
        assert_eq!(kph, vec![45, 35, 25, 15]);
    }

    #[test]
    fn passable_rule_cases() {
        let fv = |depth, rain| FeatureVector {
            flood_depth_5yr: depth,
            rainfall_mm: rain,
            is_raining: false,
            bridge: false,
            road_priority: RoadPriority::Low,
        };
        assert!(passable_rule(&fv(0.0, 200.0)));
        assert!(!passable_rule(&fv(0.31, 30.1)));
        assert!(passable_rule(&fv(0.31, 30.0)));
        assert!(!passable_rule(&fv(0.51, 10.1)));
        assert!(passable_rule(&fv(0.5, 25.0)));
    }

    #[test]
    fn sanitize_orders_and_clamps() {
        let risk = RiskThresholds {
            low_lt: 4.0,
            medium_le: 3.0,
        }
        .sanitized();
        assert_eq!(risk, RiskThresholds { low_lt: 4.0, medium_le: 4.0 });

        let speed = SpeedThresholds {
            normal_lt: -1.0,
            caution_lt: f64::NAN,
            slow_lt: 5000.0,
        }
        .sanitized();
        assert_eq!(
            speed,
            SpeedThresholds {
                normal_lt: 0.0,
                caution_lt: 5.0,
                slow_lt: 999.0
            }
        );
    }
}
