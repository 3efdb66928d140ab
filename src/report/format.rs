//! Formatted terminal output for `build` and `score`.
//!
//! Formatting lives here so the engine and the pipeline never build strings.

use std::path::Path;

use crate::cost::CostWeights;
use crate::dataset::AssembledDataset;
use crate::domain::{FeatureVector, RiskBand, SpeedBand, TrainingRow, flag};
use crate::report::DatasetSummary;

const SPEED_BANDS: [SpeedBand; 4] = [SpeedBand::Normal, SpeedBand::Caution, SpeedBand::Slow, SpeedBand::Extreme];

/// Summary printed after `routing-risk build`.
pub fn format_build_summary(
    dataset: &AssembledDataset,
    summary: Option<&DatasetSummary>,
    out_path: &Path,
    weights: &CostWeights,
) -> String {
    let mut out = String::new();

    out.push_str("=== routing-risk - training table ===\n");
    out.push_str(&format!(
        "Join: {} roads x {} weather = {} candidate rows\n",
        dataset.roads, dataset.weather, dataset.candidate_rows
    ));
    let sampled = if dataset.sampled { " (sampled)" } else { "" };
    out.push_str(&format!("Rows: {}{sampled}\n", dataset.rows.len()));
    out.push_str(&format!("Weights: {}\n", weights.version));
    out.push_str(&format!("Output: {}\n", out_path.display()));

    let Some(s) = summary else {
        out.push_str("\n(no rows)\n");
        return out;
    };

    out.push_str(&format!(
        "\nrouting_cost: min={:.3} mean={:.3} max={:.3}\n",
        s.cost_min, s.cost_mean, s.cost_max
    ));

    out.push_str("\nRisk bands:\n");
    for (band, count) in RiskBand::ALL.iter().zip(s.risk_counts) {
        out.push_str(&format_count(band.label(), count, s.rows));
    }

    out.push_str("\nSpeed bands:\n");
    for (band, count) in SPEED_BANDS.iter().zip(s.speed_counts) {
        out.push_str(&format_count(band.label(), count, s.rows));
    }

    out.push_str(&format!(
        "\nImpassable: rule={} cost>5={}\n",
        s.impassable_rule, s.impassable_cost5
    ));

    out
}

/// Output of `routing-risk score` for a single observation.
pub fn format_score(row: &TrainingRow) -> String {
    let f = &row.features;
    let a = &row.analysis;
    let mut out = String::new();

    out.push_str("Features:\n");
    out.push_str(&format!("  flood_depth_5yr = {:.3}\n", f.flood_depth_5yr));
    out.push_str(&format!("  rainfall_mm     = {:.3}\n", f.rainfall_mm));
    out.push_str(&format!("  is_raining      = {}\n", flag(f.is_raining)));
    out.push_str(&format!("  bridge          = {}\n", flag(f.bridge)));
    out.push_str(&format!(
        "  road_priority   = {} ({})\n",
        f.road_priority.code(),
        f.road_priority.label()
    ));
    out.push_str(&format!("routing_cost: {:.3}\n", row.routing_cost));
    out.push_str(&format!("risk: {}\n", a.risk_band));
    out.push_str(&format!(
        "speed: {} ({} km/h)\n",
        a.speed_band,
        a.speed_band.recommended_speed_kph()
    ));
    out.push_str(&format!(
        "passable: rule={} cost<=5={}\n",
        flag(a.passable_rule),
        flag(a.passable_cost5)
    ));

    out
}

/// Model input vector as presented to an external model, in `order`.
pub fn format_model_input(order: &[String], values: &[f64]) -> String {
    let cells: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let mut out = format!("Model input: [{}]\n", cells.join(", "));
    for name in order {
        if FeatureVector::default().value(name).is_none() {
            out.push_str(&format!("  {name} (unknown, 0)\n"));
        }
    }
    out
}

fn format_count(label: &str, count: usize, total: usize) -> String {
    let pct = if total == 0 { 0.0 } else { 100.0 * count as f64 / total as f64 };
    format!("  {label:<8} {count:>10} {pct:>6.1}%\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{assemble_training_table, label_features};
    use crate::domain::{AssembleConfig, RawRecord, RoadPriority};
    use crate::report::summarize;

    #[test]
    fn build_summary_lists_join_and_bands() {
        let roads = vec![
            RawRecord::new().with("type", "trunk"),
            RawRecord::new().with("type", "residential"),
        ];
        let weather = vec![RawRecord::new().with("is_raining", 0i64)];
        let dataset = assemble_training_table(&roads, &weather, &AssembleConfig::default()).unwrap();
        let summary = summarize(&dataset.rows);

        let text = format_build_summary(&dataset, summary.as_ref(), Path::new("out.csv"), &CostWeights::CALIBRATED);
        assert!(text.contains("Join: 2 roads x 1 weather = 2 candidate rows"));
        assert!(text.contains("Rows: 2\n"));
        assert!(text.contains("Weights: calibrated-v2"));
        assert!(text.contains("routing_cost: min=1.000 mean=1.400 max=1.800"));
        assert!(text.contains("  low               2  100.0%"));
    }

    #[test]
    fn build_summary_without_rows() {
        let dataset = assemble_training_table(&[], &[], &AssembleConfig::default()).unwrap();
        let text = format_build_summary(&dataset, None, Path::new("out.csv"), &CostWeights::CALIBRATED);
        assert!(text.ends_with("(no rows)\n"));
    }

    #[test]
    fn score_output() {
        let row = label_features(
            FeatureVector {
                flood_depth_5yr: 1.0,
                rainfall_mm: 50.0,
                is_raining: true,
                bridge: true,
                road_priority: RoadPriority::High,
            },
            &Default::default(),
        );
        let text = format_score(&row);
        assert!(text.contains("road_priority   = 3 (high)"));
        assert!(text.contains("routing_cost: 8.000"));
        assert!(text.contains("risk: high"));
        assert!(text.contains("speed: extreme (15 km/h)"));
    }
}
