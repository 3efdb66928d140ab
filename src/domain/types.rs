//! Shared domain types.
//!
//! Raw inputs (`RawValue`, `RawRecord`, `RawTable`) are deliberately loose: they
//! hold whatever a road or weather export contained. Everything downstream of
//! the normalizer (`FeatureVector`, `TrainingRow`, the bands) is strictly typed.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const FLOOD_DEPTH_5YR: &str = "flood_depth_5yr";
pub const RAINFALL_MM: &str = "rainfall_mm";
pub const IS_RAINING: &str = "is_raining";
pub const BRIDGE: &str = "bridge";
pub const ROAD_PRIORITY: &str = "road_priority";
/// Free-text highway classification on road records.
pub const ROAD_TYPE: &str = "type";
pub const ROUTING_COST: &str = "routing_cost";

/// Positional feature contract shared with the external model.
///
/// Reordering this array breaks every model trained against it.
pub const FEATURE_ORDER: [&str; 5] = [FLOOD_DEPTH_5YR, RAINFALL_MM, IS_RAINING, BRIDGE, ROAD_PRIORITY];

/// Fields that logically belong to weather records.
pub const WEATHER_FIELDS: [&str; 3] = [RAINFALL_MM, IS_RAINING, FLOOD_DEPTH_5YR];

pub const FLOOD_DEPTH_RANGE: (f64, f64) = (0.0, 3.0);
pub const RAINFALL_RANGE: (f64, f64) = (0.0, 200.0);

/// A single raw scalar as read from a tabular source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

static MISSING: RawValue = RawValue::Missing;

impl RawValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    /// Numeric reading of the value. `None` on parse failure or NaN.
    pub fn as_number(&self) -> Option<f64> {
        let v = match self {
            RawValue::Missing => None,
            RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        v.filter(|n| !n.is_nan())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Canonical column key: trimmed, BOM-stripped, ASCII lower-case.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

/// One row of a road or weather source.
///
/// Column names are normalized on insert; lookups of absent columns read as
/// `RawValue::Missing`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy in tests and the `score` command.
    pub fn with(mut self, name: &str, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<RawValue>) {
        self.fields.insert(normalize_column_name(name), value.into());
    }

    /// Look up a column by its normalized name.
    pub fn get(&self, name: &str) -> &RawValue {
        self.fields.get(name).unwrap_or(&MISSING)
    }
}

/// A parsed tabular source: header order plus rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Anything the feature builder can read raw fields from.
pub trait FieldSource {
    fn field(&self, name: &str) -> &RawValue;
}

impl FieldSource for RawRecord {
    fn field(&self, name: &str) -> &RawValue {
        self.get(name)
    }
}

/// One road paired with one weather sample.
///
/// Weather fields are read from the weather record first and fall back to the
/// road record when missing (road exports often carry `flood_depth_5yr` per
/// segment). Every other field is read from the road record only.
#[derive(Debug, Clone, Copy)]
pub struct JoinedObservation<'a> {
    pub road: &'a RawRecord,
    pub weather: &'a RawRecord,
}

impl<'a> JoinedObservation<'a> {
    pub fn new(road: &'a RawRecord, weather: &'a RawRecord) -> Self {
        Self { road, weather }
    }
}

impl FieldSource for JoinedObservation<'_> {
    fn field(&self, name: &str) -> &RawValue {
        if !WEATHER_FIELDS.contains(&name) {
            return self.road.get(name);
        }
        let value = self.weather.get(name);
        if value.is_missing() { self.road.get(name) } else { value }
    }
}

/// Ordinal road priority code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RoadPriority {
    #[default]
    NoInfo = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl RoadPriority {
    pub const ALL: [RoadPriority; 4] = [
        RoadPriority::NoInfo,
        RoadPriority::Low,
        RoadPriority::Medium,
        RoadPriority::High,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode an integer code, clamping out-of-range values into `0..=3`.
    pub fn from_code(code: i64) -> Self {
        match code {
            i64::MIN..=0 => RoadPriority::NoInfo,
            1 => RoadPriority::Low,
            2 => RoadPriority::Medium,
            _ => RoadPriority::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoadPriority::NoInfo => "no_info",
            RoadPriority::Low => "low",
            RoadPriority::Medium => "medium",
            RoadPriority::High => "high",
        }
    }
}

/// The canonical normalized feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    /// Meters, within `FLOOD_DEPTH_RANGE` once normalized.
    pub flood_depth_5yr: f64,
    /// Millimeters, within `RAINFALL_RANGE` once normalized.
    pub rainfall_mm: f64,
    pub is_raining: bool,
    pub bridge: bool,
    pub road_priority: RoadPriority,
}

impl FeatureVector {
    /// Values in `FEATURE_ORDER`, as presented to the model.
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.flood_depth_5yr,
            self.rainfall_mm,
            flag(self.is_raining) as f64,
            flag(self.bridge) as f64,
            self.road_priority.code() as f64,
        ]
    }

    /// Value of a single feature by name. `None` for names outside `FEATURE_ORDER`.
    pub fn value(&self, name: &str) -> Option<f64> {
        let idx = FEATURE_ORDER.iter().position(|f| *f == name)?;
        Some(self.to_array()[idx])
    }

    /// Model input laid out in an externally supplied feature order.
    ///
    /// Names are matched exactly; unknown names contribute `0.0` so a model
    /// trained on an extra column still receives a vector of the right width.
    pub fn values_in_order<S: AsRef<str>>(&self, order: &[S]) -> Vec<f64> {
        order
            .iter()
            .map(|name| self.value(name.as_ref()).unwrap_or(0.0))
            .collect()
    }
}

pub fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// Risk classification of a routing cost (UI/debugging only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub const ALL: [RiskBand; 3] = [RiskBand::Low, RiskBand::Medium, RiskBand::High];

    pub fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Speed guidance derived from a routing cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedBand {
    Normal,
    Caution,
    Slow,
    Extreme,
}

impl SpeedBand {
    pub fn label(self) -> &'static str {
        match self {
            SpeedBand::Normal => "normal",
            SpeedBand::Caution => "caution",
            SpeedBand::Slow => "slow",
            SpeedBand::Extreme => "extreme",
        }
    }

    /// Suggested travel speed for the band, in km/h.
    pub fn recommended_speed_kph(self) -> u32 {
        match self {
            SpeedBand::Normal => 45,
            SpeedBand::Caution => 35,
            SpeedBand::Slow => 25,
            SpeedBand::Extreme => 15,
        }
    }
}

impl fmt::Display for SpeedBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk band cut-offs.
///
/// `low` when `cost < low_lt`, `medium` when `low_lt <= cost <= medium_le`,
/// otherwise `high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub low_lt: f64,
    pub medium_le: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_lt: 2.5,
            medium_le: 5.0,
        }
    }
}

/// Speed band cut-offs; every boundary is an exclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedThresholds {
    pub normal_lt: f64,
    pub caution_lt: f64,
    pub slow_lt: f64,
}

impl Default for SpeedThresholds {
    fn default() -> Self {
        Self {
            normal_lt: 2.5,
            caution_lt: 5.0,
            slow_lt: 7.0,
        }
    }
}

/// Scalability controls for the road × weather cross join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssembleConfig {
    /// Maximum number of joined rows to process. `None` means unbounded.
    pub row_cap: Option<usize>,
    /// Seed for downsampling when the cross join exceeds `row_cap`.
    ///
    /// Without a seed an oversized join is reported as a capacity error.
    pub sample_seed: Option<u64>,
}

/// Analysis-only labels attached to a training row. Never used as features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisLabels {
    pub risk_band: RiskBand,
    pub speed_band: SpeedBand,
    /// Conservative rule-based passability (1 = passable).
    pub passable_rule: bool,
    /// 1 when `routing_cost <= 5.0`.
    pub passable_cost5: bool,
}

/// One row of the assembled training table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRow {
    pub features: FeatureVector,
    pub routing_cost: f64,
    pub analysis: AnalysisLabels,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureVector {
        FeatureVector {
            flood_depth_5yr: 1.0,
            rainfall_mm: 50.0,
            is_raining: true,
            bridge: false,
            road_priority: RoadPriority::Medium,
        }
    }

    #[test]
    fn default_order_matches_array() {
        let fv = sample();
        assert_eq!(fv.values_in_order(&FEATURE_ORDER), fv.to_array().to_vec());
    }

    #[test]
    fn reordered_feature_names() {
        let order = ["road_priority", "bridge", "is_raining", "rainfall_mm", "flood_depth_5yr"];
        assert_eq!(sample().values_in_order(&order), vec![2.0, 0.0, 1.0, 50.0, 1.0]);
    }

    #[test]
    fn unknown_feature_names_are_zero() {
        let order = vec!["rainfall_mm".to_string(), "elevation_m".to_string(), "road_priority".to_string()];
        assert_eq!(sample().values_in_order(&order), vec![50.0, 0.0, 2.0]);
        assert_eq!(sample().value("elevation_m"), None);
    }

    #[test]
    fn joined_observation_reads_road_fields_from_road_only() {
        let road = RawRecord::new().with("flood_depth_5yr", 0.4);
        let weather = RawRecord::new().with("type", "trunk").with("bridge", "yes");
        let joined = JoinedObservation::new(&road, &weather);
        assert!(joined.field(ROAD_TYPE).is_missing());
        assert!(joined.field(BRIDGE).is_missing());
        assert_eq!(*joined.field(FLOOD_DEPTH_5YR), RawValue::Number(0.4));
    }
}
