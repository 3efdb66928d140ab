//! Export the assembled training table to CSV.
//!
//! Columns are the features in `FEATURE_ORDER`, then `routing_cost`, then the
//! analysis columns when requested. Flags and the road priority are written as
//! integers so the file can be fed straight into a model trainer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{FEATURE_ORDER, ROUTING_COST, TrainingRow, flag};
use crate::error::AppError;

pub const ANALYSIS_COLUMNS: [&str; 4] = ["risk_band", "speed_band", "passable_rule", "passable_cost5"];

/// Header row for the training CSV.
pub fn training_csv_header(include_analysis: bool) -> Vec<&'static str> {
    let mut header: Vec<&'static str> = FEATURE_ORDER.to_vec();
    header.push(ROUTING_COST);
    if include_analysis {
        header.extend(ANALYSIS_COLUMNS);
    }
    header
}

/// Write the training table to a CSV file.
pub fn write_training_csv(path: &Path, rows: &[TrainingRow], include_analysis: bool) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create training CSV '{}': {e}", path.display())))?;
    write_training_rows(file, rows, include_analysis)?;
    log::info!("wrote {} training rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write the training table to any writer.
pub fn write_training_rows<W: Write>(writer: W, rows: &[TrainingRow], include_analysis: bool) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(training_csv_header(include_analysis))
        .map_err(|e| AppError::io(format!("Failed to write training CSV header: {e}")))?;

    for row in rows {
        out.write_record(format_row(row, include_analysis))
            .map_err(|e| AppError::io(format!("Failed to write training CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::io(format!("Failed to flush training CSV: {e}")))?;
    Ok(())
}

fn format_row(row: &TrainingRow, include_analysis: bool) -> Vec<String> {
    let f = &row.features;
    let mut cells = vec![
        f.flood_depth_5yr.to_string(),
        f.rainfall_mm.to_string(),
        flag(f.is_raining).to_string(),
        flag(f.bridge).to_string(),
        f.road_priority.code().to_string(),
        format!("{:.6}", row.routing_cost),
    ];
    if include_analysis {
        let a = &row.analysis;
        cells.push(a.risk_band.to_string());
        cells.push(a.speed_band.to_string());
        cells.push(flag(a.passable_rule).to_string());
        cells.push(flag(a.passable_cost5).to_string());
    }
    cells
}
