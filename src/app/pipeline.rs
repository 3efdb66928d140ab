//! The `build` workflow: ingest -> assemble -> export.
//!
//! Kept apart from `app` so it can run end to end in tests without parsing
//! argv or printing.

use std::path::PathBuf;

use chrono::Utc;

use crate::dataset::{AssembledDataset, Labeling, assemble_with};
use crate::domain::AssembleConfig;
use crate::error::AppError;
use crate::io::{TrainingInfo, build_meta, read_raw_table, write_meta_json, write_training_csv};
use crate::report::{DatasetSummary, summarize};

/// Resolved configuration for one `build` run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub roads_path: PathBuf,
    pub weather_path: PathBuf,
    pub out_path: PathBuf,
    pub meta_path: Option<PathBuf>,
    pub assemble: AssembleConfig,
    pub include_analysis: bool,
}

/// All computed outputs of a single `build` run.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub dataset: AssembledDataset,
    pub summary: Option<DatasetSummary>,
    pub labeling: Labeling,
}

pub fn run_build(config: &BuildConfig) -> Result<BuildOutput, AppError> {
    let roads = read_raw_table(&config.roads_path)?;
    let weather = read_raw_table(&config.weather_path)?;

    let labeling = Labeling::default();
    let dataset = assemble_with(&roads.table.rows, &weather.table.rows, &config.assemble, &labeling)?;

    write_training_csv(&config.out_path, &dataset.rows, config.include_analysis)?;

    if let Some(path) = &config.meta_path {
        let training = TrainingInfo::new(dataset.rows.len(), &config.assemble);
        write_meta_json(path, &build_meta(training, Utc::now()))?;
    }

    let summary = summarize(&dataset.rows);
    Ok(BuildOutput {
        dataset,
        summary,
        labeling,
    })
}
