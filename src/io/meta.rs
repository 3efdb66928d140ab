//! Model metadata JSON: the contract between training and inference.
//!
//! The writer records everything an inference service needs to present
//! features in the right order and to interpret predicted costs: feature
//! order, encodings, band thresholds, cost weights, input clamps and how the
//! training table was produced.
//!
//! The reader is tolerant. Metadata is produced by a separate training step
//! and may be missing, stale or hand-edited, so every field falls back to the
//! built-in default and thresholds are sanitized before use.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cost::CostWeights;
use crate::domain::{
    AssembleConfig, FEATURE_ORDER, FLOOD_DEPTH_RANGE, RAINFALL_RANGE, RiskThresholds, SpeedThresholds,
};
use crate::error::AppError;

pub const MODEL_NAME: &str = "routing-risk";

#[derive(Debug, Clone, Serialize)]
pub struct ModelMeta {
    pub model: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<&'static str>,
    #[serde(rename = "featureOrder")]
    pub feature_order: Vec<&'static str>,
    pub encoding: Encoding,
    pub risk_thresholds: RiskThresholds,
    pub speed_guidance_thresholds: SpeedThresholds,
    pub cost_weights: CostWeights,
    pub clamps: Clamps,
    pub training: TrainingInfo,
    pub generated_at: DateTime<Utc>,
    pub notes: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Encoding {
    pub road_priority: &'static str,
    pub bridge: &'static str,
    pub is_raining: &'static str,
}

impl Default for Encoding {
    fn default() -> Self {
        Self {
            road_priority: "0=no_info, 1=low, 2=medium, 3=high",
            bridge: "0/1",
            is_raining: "0/1",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Clamps {
    pub flood_depth_5yr: [f64; 2],
    pub rainfall_mm: [f64; 2],
}

impl Default for Clamps {
    fn default() -> Self {
        Self {
            flood_depth_5yr: [FLOOD_DEPTH_RANGE.0, FLOOD_DEPTH_RANGE.1],
            rainfall_mm: [RAINFALL_RANGE.0, RAINFALL_RANGE.1],
        }
    }
}

/// How the training table was produced. Absent for a standalone `meta` run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingInfo {
    pub rows_used: Option<usize>,
    pub row_cap: Option<usize>,
    pub sample_seed: Option<u64>,
}

impl TrainingInfo {
    pub fn new(rows_used: usize, config: &AssembleConfig) -> Self {
        Self {
            rows_used: Some(rows_used),
            row_cap: config.row_cap,
            sample_seed: config.sample_seed,
        }
    }
}

const NOTES: [&str; 3] = [
    "routing_cost is a soft risk score used to rank route alternatives.",
    "Avoid hard-blocking solely based on rainfall; only hard-block with strong flood evidence (high flood depth and heavy rain).",
    "Without flood-data coverage in an area, consider zeroing flood_depth_5yr (and optionally rainfall inputs) at inference time.",
];

/// Metadata for the calibrated weights and default thresholds.
pub fn build_meta(training: TrainingInfo, generated_at: DateTime<Utc>) -> ModelMeta {
    ModelMeta {
        model: MODEL_NAME,
        kind: "regression",
        features: FEATURE_ORDER.to_vec(),
        feature_order: FEATURE_ORDER.to_vec(),
        encoding: Encoding::default(),
        risk_thresholds: RiskThresholds::default(),
        speed_guidance_thresholds: SpeedThresholds::default(),
        cost_weights: CostWeights::CALIBRATED,
        clamps: Clamps::default(),
        training,
        generated_at,
        notes: NOTES.to_vec(),
    }
}

/// Write a metadata JSON file (pretty-printed).
pub fn write_meta_json(path: &Path, meta: &ModelMeta) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create metadata JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, meta)
        .map_err(|e| AppError::io(format!("Failed to write metadata JSON: {e}")))?;
    log::info!("wrote model metadata to {}", path.display());
    Ok(())
}

/// What an inference consumer takes from the metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaConfig {
    pub feature_order: Vec<String>,
    pub risk: RiskThresholds,
    pub speed: SpeedThresholds,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            feature_order: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            risk: RiskThresholds::default(),
            speed: SpeedThresholds::default(),
        }
    }
}

/// Read metadata, falling back to defaults when the file is absent or invalid.
pub fn read_meta_config(path: &Path) -> MetaConfig {
    let doc = match File::open(path) {
        Ok(file) => serde_json::from_reader::<_, Value>(file),
        Err(e) => {
            log::warn!("metadata '{}' not readable ({e}); using defaults", path.display());
            return MetaConfig::default();
        }
    };
    match doc {
        Ok(doc) => meta_config_from_value(&doc),
        Err(e) => {
            log::warn!("metadata '{}' is not valid JSON ({e}); using defaults", path.display());
            MetaConfig::default()
        }
    }
}

/// Resolve a `MetaConfig` from an already-parsed JSON document.
pub fn meta_config_from_value(doc: &Value) -> MetaConfig {
    let defaults = MetaConfig::default();

    let risk_doc = &doc["risk_thresholds"];
    let risk = RiskThresholds {
        low_lt: number_or(&risk_doc["low_lt"], defaults.risk.low_lt),
        medium_le: number_or(&risk_doc["medium_le"], defaults.risk.medium_le),
    }
    .sanitized();

    let speed_doc = &doc["speed_guidance_thresholds"];
    let speed = SpeedThresholds {
        normal_lt: number_or(&speed_doc["normal_lt"], defaults.speed.normal_lt),
        caution_lt: number_or(&speed_doc["caution_lt"], defaults.speed.caution_lt),
        slow_lt: number_or(&speed_doc["slow_lt"], defaults.speed.slow_lt),
    }
    .sanitized();

    let feature_order = resolve_feature_order(doc).unwrap_or(defaults.feature_order);

    MetaConfig {
        feature_order,
        risk,
        speed,
    }
}

/// `featureOrder`, else `features`; blank entries are dropped.
fn resolve_feature_order(doc: &Value) -> Option<Vec<String>> {
    let list = doc["featureOrder"]
        .as_array()
        .or_else(|| doc["features"].as_array())?;
    let names: Vec<String> = list
        .iter()
        .map(|v| match v {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() { None } else { Some(names) }
}

fn number_or(value: &Value, fallback: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn written_meta_has_contract_fields() {
        let config = AssembleConfig {
            row_cap: Some(150_000),
            sample_seed: Some(42),
        };
        let meta = build_meta(TrainingInfo::new(1200, &config), fixed_time());
        let doc = serde_json::to_value(&meta).unwrap();

        assert_eq!(doc["model"], "routing-risk");
        assert_eq!(doc["type"], "regression");
        assert_eq!(
            doc["featureOrder"],
            json!(["flood_depth_5yr", "rainfall_mm", "is_raining", "bridge", "road_priority"])
        );
        assert_eq!(doc["features"], doc["featureOrder"]);
        assert_eq!(doc["encoding"]["road_priority"], "0=no_info, 1=low, 2=medium, 3=high");
        assert_eq!(doc["risk_thresholds"], json!({"low_lt": 2.5, "medium_le": 5.0}));
        assert_eq!(
            doc["speed_guidance_thresholds"],
            json!({"normal_lt": 2.5, "caution_lt": 5.0, "slow_lt": 7.0})
        );
        assert_eq!(doc["cost_weights"]["version"], "calibrated-v2");
        assert_eq!(doc["clamps"]["rainfall_mm"], json!([0.0, 200.0]));
        assert_eq!(doc["training"], json!({"rows_used": 1200, "row_cap": 150000, "sample_seed": 42}));
        assert_eq!(doc["generated_at"], "2025-06-01T12:00:00Z");
        assert_eq!(doc["notes"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routing-risk.meta.json");
        write_meta_json(&path, &build_meta(TrainingInfo::default(), fixed_time())).unwrap();
        assert_eq!(read_meta_config(&path), MetaConfig::default());
    }

    #[test]
    fn missing_or_broken_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_meta_config(&dir.path().join("absent.json")), MetaConfig::default());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_meta_config(&path), MetaConfig::default());
    }

    #[test]
    fn feature_order_prefers_feature_order_then_features() {
        let doc = json!({"featureOrder": ["a", " b "], "features": ["x"]});
        assert_eq!(meta_config_from_value(&doc).feature_order, vec!["a", "b"]);

        let doc = json!({"featureOrder": "nope", "features": ["x", ""]});
        assert_eq!(meta_config_from_value(&doc).feature_order, vec!["x"]);

        let doc = json!({"featureOrder": []});
        assert_eq!(meta_config_from_value(&doc).feature_order, MetaConfig::default().feature_order);
    }

    #[test]
    fn thresholds_are_coerced_and_sanitized() {
        let doc = json!({
            "risk_thresholds": {"low_lt": "3", "medium_le": 1.0},
            "speed_guidance_thresholds": {"normal_lt": -4, "caution_lt": null, "slow_lt": 1e6}
        });
        let cfg = meta_config_from_value(&doc);
        assert_eq!(cfg.risk, RiskThresholds { low_lt: 3.0, medium_le: 3.0 });
        assert_eq!(
            cfg.speed,
            SpeedThresholds {
                normal_lt: 0.0,
                caution_lt: 5.0,
                slow_lt: 999.0
            }
        );
    }
}
