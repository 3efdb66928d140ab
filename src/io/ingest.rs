//! CSV ingest into loosely typed `RawTable`s.
//!
//! Road and weather exports come from different tools and are not cleaned
//! beforehand, so nothing here rejects values. Each column is typed once, from
//! all of its cells:
//! - every non-empty cell parses as a number: `Number`
//! - otherwise every non-empty cell is `true`/`false`: `Bool`
//! - otherwise: `Text`
//!
//! Empty and NA-like cells are `Missing` regardless of the column type. The
//! Field Normalizer decides what each raw value means.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{RawRecord, RawTable, RawValue, normalize_column_name};
use crate::error::AppError;

/// Cell spellings read as missing. Matched exactly: `NONE` or `Na` are text.
const NA_TOKENS: [&str; 11] = ["", "NA", "N/A", "n/a", "<NA>", "#N/A", "NaN", "nan", "NULL", "null", "None"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the parsed table plus the rows that could not be read.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: RawTable,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Number,
    Bool,
    Text,
}

/// Read a CSV file from disk.
pub fn read_raw_table(path: &Path) -> Result<IngestedTable, AppError> {
    let file =
        File::open(path).map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = parse_raw_table(file)
        .map_err(|e| AppError::io(format!("Failed to read CSV '{}': {}", path.display(), e.message())))?;

    log::info!(
        "read {} rows x {} columns from {}",
        ingested.table.len(),
        ingested.table.columns.len(),
        path.display()
    );
    for err in &ingested.row_errors {
        log::warn!("{}: line {}: {}", path.display(), err.line, err.message);
    }
    Ok(ingested)
}

/// Parse CSV from any reader.
///
/// Only a missing or unreadable header row is an error; unreadable rows are
/// reported in `row_errors` and skipped.
pub fn parse_raw_table<R: Read>(reader: R) -> Result<IngestedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::io(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_column_name)
        .collect();

    let mut cells: Vec<Vec<String>> = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; lines are 1-based.
        let line = idx + 2;
        rows_read += 1;
        match result {
            Ok(record) => cells.push(
                (0..columns.len())
                    .map(|i| record.get(i).unwrap_or("").to_string())
                    .collect(),
            ),
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    let kinds: Vec<ColumnKind> = (0..columns.len())
        .map(|i| infer_column_kind(cells.iter().map(|row| row[i].as_str())))
        .collect();

    let rows = cells
        .into_iter()
        .map(|row| {
            let mut record = RawRecord::new();
            for ((name, kind), cell) in columns.iter().zip(&kinds).zip(row) {
                if !name.is_empty() {
                    record.insert(name, parse_cell(cell, *kind));
                }
            }
            record
        })
        .collect();

    Ok(IngestedTable {
        table: RawTable { columns, rows },
        row_errors,
        rows_read,
    })
}

fn is_na(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn infer_column_kind<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
    let present = cells.filter(|c| !is_na(c));
    if present.clone().all(|c| c.parse::<f64>().is_ok()) {
        ColumnKind::Number
    } else if present.clone().all(|c| parse_bool(c).is_some()) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

fn parse_cell(cell: String, kind: ColumnKind) -> RawValue {
    if is_na(&cell) {
        return RawValue::Missing;
    }
    match kind {
        ColumnKind::Number => cell.parse::<f64>().map(RawValue::Number).unwrap_or(RawValue::Missing),
        ColumnKind::Bool => parse_bool(&cell).map(RawValue::Bool).unwrap_or(RawValue::Missing),
        ColumnKind::Text => RawValue::Text(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoadPriority;
    use std::io::Write;

    fn parse(csv: &str) -> IngestedTable {
        parse_raw_table(csv.as_bytes()).unwrap()
    }

    #[test]
    fn infers_column_types_like_a_dataframe() {
        let t = parse(
            "osm_id,type,bridge,is_raining,flood_depth_5yr\n\
             1,trunk,yes,True,0.5\n\
             2,,no,False,\n\
             3,residential,1,true,NaN\n",
        )
        .table;

        assert_eq!(t.columns, vec!["osm_id", "type", "bridge", "is_raining", "flood_depth_5yr"]);
        assert_eq!(t.len(), 3);
        assert_eq!(*t.rows[0].get("osm_id"), RawValue::Number(1.0));
        assert_eq!(*t.rows[0].get("type"), RawValue::Text("trunk".into()));
        assert!(t.rows[1].get("type").is_missing());
        // A mixed column stays text, even for numeric-looking cells.
        assert_eq!(*t.rows[2].get("bridge"), RawValue::Text("1".into()));
        assert_eq!(*t.rows[0].get("is_raining"), RawValue::Bool(true));
        assert_eq!(*t.rows[1].get("is_raining"), RawValue::Bool(false));
        assert_eq!(*t.rows[0].get("flood_depth_5yr"), RawValue::Number(0.5));
        assert!(t.rows[1].get("flood_depth_5yr").is_missing());
        assert!(t.rows[2].get("flood_depth_5yr").is_missing());
    }

    #[test]
    fn na_tokens_are_case_sensitive() {
        let t = parse("type\nNONE\nNa\nNone\nnull\n").table;
        let types: Vec<&RawValue> = t.rows.iter().map(|r| r.get("type")).collect();
        assert_eq!(*types[0], RawValue::Text("NONE".into()));
        assert_eq!(*types[1], RawValue::Text("Na".into()));
        assert!(types[2].is_missing());
        assert!(types[3].is_missing());

        let encoded: Vec<_> = t.rows.iter().map(|r| crate::features::build_feature_vector(r).road_priority).collect();
        assert_eq!(
            encoded,
            vec![RoadPriority::Low, RoadPriority::Low, RoadPriority::NoInfo, RoadPriority::NoInfo]
        );
    }

    #[test]
    fn headers_are_normalized() {
        let t = parse("\u{feff}Rainfall_MM , IS_RAINING\n12.5,1\n").table;
        assert!(t.has_column("rainfall_mm"));
        assert!(t.has_column("is_raining"));
        assert_eq!(*t.rows[0].get("rainfall_mm"), RawValue::Number(12.5));
    }

    #[test]
    fn short_rows_read_as_missing() {
        let t = parse("a,b,c\n1\n1,2,3,4\n").table;
        assert_eq!(t.len(), 2);
        assert!(t.rows[0].get("b").is_missing());
        assert!(t.rows[0].get("c").is_missing());
        assert_eq!(*t.rows[1].get("c"), RawValue::Number(3.0));
    }

    #[test]
    fn header_only_file_is_empty_table() {
        let ingested = parse("type,bridge\n");
        assert!(ingested.table.is_empty());
        assert_eq!(ingested.rows_read, 0);
        assert!(ingested.row_errors.is_empty());
    }

    #[test]
    fn invalid_utf8_row_is_reported_and_skipped() {
        let mut bytes = b"type\ntrunk\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"primary\n");
        let ingested = parse_raw_table(bytes.as_slice()).unwrap();
        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.table.len(), 2);
        assert_eq!(ingested.row_errors.len(), 1);
        assert_eq!(ingested.row_errors[0].line, 3);
    }

    #[test]
    fn reads_from_disk_and_reports_missing_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rainfall_mm,is_raining").unwrap();
        writeln!(file, "50,1").unwrap();
        let ingested = read_raw_table(file.path()).unwrap();
        assert_eq!(ingested.table.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let err = read_raw_table(&dir.path().join("absent.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }
}
