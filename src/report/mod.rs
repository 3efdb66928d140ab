//! Reporting utilities: dataset summaries and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{RiskBand, SpeedBand, TrainingRow};

/// Aggregate view of an assembled training table.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    /// Counts indexed like `RiskBand::ALL`.
    pub risk_counts: [usize; 3],
    /// Counts indexed like `SpeedBand` declaration order.
    pub speed_counts: [usize; 4],
    pub cost_min: f64,
    pub cost_max: f64,
    pub cost_mean: f64,
    pub impassable_rule: usize,
    pub impassable_cost5: usize,
}

/// Summarize a training table. `None` for an empty table.
pub fn summarize(rows: &[TrainingRow]) -> Option<DatasetSummary> {
    if rows.is_empty() {
        return None;
    }

    let mut risk_counts = [0usize; 3];
    let mut speed_counts = [0usize; 4];
    let mut cost_min = f64::INFINITY;
    let mut cost_max = f64::NEG_INFINITY;
    let mut cost_sum = 0.0;
    let mut impassable_rule = 0usize;
    let mut impassable_cost5 = 0usize;

    for row in rows {
        let a = &row.analysis;
        risk_counts[risk_index(a.risk_band)] += 1;
        speed_counts[speed_index(a.speed_band)] += 1;
        cost_min = cost_min.min(row.routing_cost);
        cost_max = cost_max.max(row.routing_cost);
        cost_sum += row.routing_cost;
        impassable_rule += usize::from(!a.passable_rule);
        impassable_cost5 += usize::from(!a.passable_cost5);
    }

    Some(DatasetSummary {
        rows: rows.len(),
        risk_counts,
        speed_counts,
        cost_min,
        cost_max,
        cost_mean: cost_sum / rows.len() as f64,
        impassable_rule,
        impassable_cost5,
    })
}

fn risk_index(band: RiskBand) -> usize {
    match band {
        RiskBand::Low => 0,
        RiskBand::Medium => 1,
        RiskBand::High => 2,
    }
}

fn speed_index(band: SpeedBand) -> usize {
    match band {
        SpeedBand::Normal => 0,
        SpeedBand::Caution => 1,
        SpeedBand::Slow => 2,
        SpeedBand::Extreme => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::label_features;
    use crate::domain::{FeatureVector, RoadPriority};

    fn row(depth: f64, rain: f64, raining: bool, priority: RoadPriority) -> TrainingRow {
        label_features(
            FeatureVector {
                flood_depth_5yr: depth,
                rainfall_mm: rain,
                is_raining: raining,
                bridge: false,
                road_priority: priority,
            },
            &Default::default(),
        )
    }

    #[test]
    fn empty_table_has_no_summary() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn counts_bands_and_cost_range() {
        let rows = vec![
            row(0.0, 0.0, false, RoadPriority::High),   // 1.0
            row(0.0, 0.0, false, RoadPriority::Medium), // 1.4
            row(2.0, 40.0, true, RoadPriority::Low),    // 1.8 + 3 + 4 = 8.8
        ];
        let s = summarize(&rows).unwrap();
        assert_eq!(s.rows, 3);
        assert_eq!(s.risk_counts, [2, 0, 1]);
        assert_eq!(s.speed_counts, [2, 0, 0, 1]);
        assert!((s.cost_min - 1.0).abs() < 1e-9);
        assert!((s.cost_max - 8.8).abs() < 1e-9);
        assert!((s.cost_mean - (1.0 + 1.4 + 8.8) / 3.0).abs() < 1e-9);
        assert_eq!(s.impassable_rule, 1);
        assert_eq!(s.impassable_cost5, 1);
    }
}
