//! Command-line parsing for the routing-risk feature and cost engine.
//!
//! Argument parsing stays here; `app` maps parsed arguments into explicit
//! configuration structs before anything runs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "routing-risk",
    version,
    about = "Feature and routing-cost engine for flood-aware routing risk"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cross join road and weather CSVs into a labelled training table.
    Build(BuildArgs),
    /// Normalize, cost and classify a single observation.
    Score(ScoreArgs),
    /// Write the model metadata JSON without building a table.
    Meta(MetaArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct BuildArgs {
    /// Road segments CSV (`type`, `bridge`, optionally `flood_depth_5yr`).
    #[arg(long, value_name = "CSV")]
    pub roads: PathBuf,

    /// Weather samples CSV (`rainfall_mm`, `is_raining`, optionally `flood_depth_5yr`).
    #[arg(long, value_name = "CSV")]
    pub weather: PathBuf,

    /// Output training table CSV.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Also write model metadata JSON.
    #[arg(long, value_name = "JSON")]
    pub meta: Option<PathBuf>,

    /// Maximum joined rows to produce; 0 means unbounded.
    #[arg(long, env = "ROUTING_RISK_ROW_CAP", default_value_t = 0)]
    pub row_cap: usize,

    /// Seed for downsampling a join larger than `--row-cap`.
    ///
    /// Without a seed an oversized join is an error.
    #[arg(long, env = "ROUTING_RISK_SEED")]
    pub seed: Option<u64>,

    /// Append analysis columns (risk/speed bands, passability).
    #[arg(long)]
    pub analysis: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct ScoreArgs {
    /// Highway classification (e.g. trunk, secondary, residential).
    #[arg(long = "type", default_value = "")]
    pub road_type: String,

    /// Bridge flag (yes/no/true/false/1/0).
    #[arg(long, default_value = "no")]
    pub bridge: String,

    /// Raining flag (any non-zero number means raining).
    #[arg(long, default_value = "0")]
    pub is_raining: String,

    /// 5-year flood depth in meters.
    #[arg(long, default_value = "0")]
    pub flood_depth: String,

    /// Rainfall in millimeters.
    #[arg(long, default_value = "0")]
    pub rainfall: String,

    /// Read band thresholds from model metadata JSON.
    #[arg(long, value_name = "JSON")]
    pub meta: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct MetaArgs {
    /// Output metadata JSON.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,
}
