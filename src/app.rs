//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - maps arguments into explicit configuration
//! - runs the requested workflow and prints its report

use chrono::Utc;
use clap::Parser;

use crate::cli::{BuildArgs, Command, MetaArgs, ScoreArgs};
use crate::dataset::{Labeling, label_features};
use crate::domain::{AssembleConfig, BRIDGE, FLOOD_DEPTH_5YR, IS_RAINING, RAINFALL_MM, ROAD_TYPE, RawRecord};
use crate::error::AppError;
use crate::features::build_feature_vector;
use crate::io::{MetaConfig, TrainingInfo, build_meta, read_meta_config, write_meta_json};

pub mod pipeline;

/// Entry point for the `routing-risk` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may carry ROUTING_RISK_ROW_CAP / ROUTING_RISK_SEED; load it before
    // clap reads env-backed arguments.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Build(args) => handle_build(args),
        Command::Score(args) => handle_score(args),
        Command::Meta(args) => handle_meta(args),
    }
}

fn handle_build(args: BuildArgs) -> Result<(), AppError> {
    let config = build_config_from_args(&args);
    let run = pipeline::run_build(&config)?;

    println!(
        "{}",
        crate::report::format_build_summary(
            &run.dataset,
            run.summary.as_ref(),
            &config.out_path,
            &run.labeling.weights
        )
    );
    Ok(())
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let meta = args.meta.as_deref().map(read_meta_config).unwrap_or_default();
    println!("{}", score_report(&args, &meta));
    Ok(())
}

/// Score one observation with the thresholds and feature order from `meta`.
fn score_report(args: &ScoreArgs, meta: &MetaConfig) -> String {
    let labeling = Labeling {
        risk: meta.risk,
        speed: meta.speed,
        ..Labeling::default()
    };
    let features = build_feature_vector(&score_record(args));
    let row = label_features(features, &labeling);

    let mut out = crate::report::format_score(&row);
    out.push_str(&crate::report::format_model_input(
        &meta.feature_order,
        &features.values_in_order(&meta.feature_order),
    ));
    out
}

fn handle_meta(args: MetaArgs) -> Result<(), AppError> {
    write_meta_json(&args.out, &build_meta(TrainingInfo::default(), Utc::now()))
}

pub fn build_config_from_args(args: &BuildArgs) -> pipeline::BuildConfig {
    pipeline::BuildConfig {
        roads_path: args.roads.clone(),
        weather_path: args.weather.clone(),
        out_path: args.out.clone(),
        meta_path: args.meta.clone(),
        assemble: AssembleConfig {
            row_cap: (args.row_cap > 0).then_some(args.row_cap),
            sample_seed: args.seed,
        },
        include_analysis: args.analysis,
    }
}

/// Command-line values are passed through as raw text; the normalizer decides
/// what they mean, exactly as for CSV cells.
fn score_record(args: &ScoreArgs) -> RawRecord {
    RawRecord::new()
        .with(ROAD_TYPE, args.road_type.as_str())
        .with(BRIDGE, args.bridge.as_str())
        .with(IS_RAINING, args.is_raining.as_str())
        .with(FLOOD_DEPTH_5YR, args.flood_depth.as_str())
        .with(RAINFALL_MM, args.rainfall.as_str())
}
