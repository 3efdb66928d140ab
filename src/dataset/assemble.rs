//! Road × weather cross join and training-table assembly.
//!
//! Every road is paired with every weather sample (scenario expansion). The
//! join is addressed by a flat pair index `k = road * W + weather`, so it is
//! never materialized beyond the rows actually processed. When the join is
//! larger than the configured cap the caller either gets a `CapacityError` or,
//! with a sample seed, a reproducible uniform sample of pair indices.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use rayon::prelude::*;

use crate::cost::{CostWeights, analysis_labels, compute_routing_cost};
use crate::domain::{
    AssembleConfig, FeatureVector, JoinedObservation, RawRecord, RiskThresholds, SpeedThresholds, TrainingRow,
};
use crate::error::{AppError, EXIT_CAPACITY};
use crate::features::build_feature_vector;

/// The cross join would exceed the configured row cap and no sampling was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityError {
    pub roads: usize,
    pub weather: usize,
    pub cap: usize,
}

impl CapacityError {
    /// `None` when `roads * weather` does not fit in `usize`.
    pub fn candidate_rows(&self) -> Option<usize> {
        self.roads.checked_mul(self.weather)
    }
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .candidate_rows()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "more than usize::MAX".to_string());
        write!(
            f,
            "Cross join of {} roads x {} weather samples is {rows} rows, above the row cap of {}. \
             Raise the cap or set a sample seed to downsample.",
            self.roads, self.weather, self.cap
        )
    }
}

impl std::error::Error for CapacityError {}

impl From<CapacityError> for AppError {
    fn from(err: CapacityError) -> Self {
        AppError::new(EXIT_CAPACITY, err.to_string())
    }
}

/// Weights and thresholds used to label each row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Labeling {
    pub weights: CostWeights,
    pub risk: RiskThresholds,
    pub speed: SpeedThresholds,
}

/// Assembled training table plus bookkeeping about how it was produced.
#[derive(Debug, Clone)]
pub struct AssembledDataset {
    pub rows: Vec<TrainingRow>,
    pub roads: usize,
    pub weather: usize,
    /// Size of the full cross join.
    pub candidate_rows: usize,
    pub sampled: bool,
}

/// Which pair indices of the cross join to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairPlan {
    /// Every pair `0..n`.
    All(usize),
    /// Ascending, distinct pair indices.
    Sampled(Vec<usize>),
}

impl PairPlan {
    pub fn len(&self) -> usize {
        match self {
            PairPlan::All(n) => *n,
            PairPlan::Sampled(idx) => idx.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decide which pairs to process under `config`.
pub fn plan_pairs(roads: usize, weather: usize, config: &AssembleConfig) -> Result<PairPlan, CapacityError> {
    let cap = config.row_cap.unwrap_or(usize::MAX);
    let too_large = CapacityError { roads, weather, cap };

    let Some(candidate) = roads.checked_mul(weather) else {
        return Err(too_large);
    };
    if candidate <= cap {
        return Ok(PairPlan::All(candidate));
    }

    let Some(seed) = config.sample_seed else {
        return Err(too_large);
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, candidate, cap).into_vec();
    picked.sort_unstable();
    Ok(PairPlan::Sampled(picked))
}

/// Normalize, cost and label one feature vector.
pub fn label_features(features: FeatureVector, labeling: &Labeling) -> TrainingRow {
    let routing_cost = compute_routing_cost(&features, &labeling.weights);
    TrainingRow {
        features,
        routing_cost,
        analysis: analysis_labels(&features, routing_cost, &labeling.risk, &labeling.speed),
    }
}

/// Build the training table with the calibrated weights and default bands.
pub fn assemble_training_table(
    roads: &[RawRecord],
    weather: &[RawRecord],
    config: &AssembleConfig,
) -> Result<AssembledDataset, CapacityError> {
    assemble_with(roads, weather, config, &Labeling::default())
}

/// Build the training table.
///
/// Rows are labelled in parallel; the output order is ascending pair index
/// regardless of scheduling.
pub fn assemble_with(
    roads: &[RawRecord],
    weather: &[RawRecord],
    config: &AssembleConfig,
    labeling: &Labeling,
) -> Result<AssembledDataset, CapacityError> {
    let plan = plan_pairs(roads.len(), weather.len(), config)?;
    let candidate_rows = roads.len() * weather.len();
    let width = weather.len();

    log::info!(
        "assembling {} of {candidate_rows} joined rows ({} roads x {} weather)",
        plan.len(),
        roads.len(),
        width
    );

    let label_pair = |k: usize| {
        let obs = JoinedObservation::new(&roads[k / width], &weather[k % width]);
        label_features(build_feature_vector(&obs), labeling)
    };

    let (rows, sampled) = match plan {
        PairPlan::All(n) => ((0..n).into_par_iter().map(label_pair).collect(), false),
        PairPlan::Sampled(idx) => {
            log::debug!("downsampled cross join to {} rows", idx.len());
            (idx.into_par_iter().map(label_pair).collect(), true)
        }
    };

    Ok(AssembledDataset {
        rows,
        roads: roads.len(),
        weather: width,
        candidate_rows,
        sampled,
    })
}
