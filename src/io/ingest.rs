//! CSV ingest and numeric coercion.
//!
//! This module is responsible for turning a wide production CSV into a `Table`:
//!
//! - **Fixed layout**: first column = entity identifier, every other column = one year
//! - **Lenient cells**: blank or non-numeric year cells become missing values, never errors
//! - **Strict structure**: malformed CSV, empty input, or duplicate headers are rejected
//! - **Separation of concerns**: no statistics or fitting logic here

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{debug, info};

use crate::domain::{NumericColumn, Table};
use crate::error::AnalysisError;

/// Open `path` and parse it as a wide production table.
pub fn load_table(path: &Path) -> Result<Table, AnalysisError> {
    let file = File::open(path)
        .map_err(|e| AnalysisError::Parse(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let table = parse_table(file)?;
    info!(
        "loaded '{}': {} rows x {} columns",
        path.display(),
        table.n_rows(),
        table.n_columns()
    );
    Ok(table)
}

/// Parse comma-separated text into a `Table`.
pub fn parse_table<R: Read>(reader: R) -> Result<Table, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::Parse(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let headers = normalize_headers(&headers);
    if headers.is_empty() {
        return Err(AnalysisError::Parse("Input has no columns.".to_string()));
    }
    ensure_unique_headers(&headers)?;
    if headers.len() < 2 {
        return Err(AnalysisError::Schema(format!(
            "Only the identifier column `{}` was found; expected one column per year.",
            headers[0]
        )));
    }

    let n_numeric = headers.len() - 1;
    let mut entities = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); n_numeric];

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, lines are 1-based.
        let line = idx + 2;
        let record =
            result.map_err(|e| AnalysisError::Parse(format!("CSV parse error on line {line}: {e}")))?;

        if record.len() > headers.len() {
            return Err(AnalysisError::Parse(format!(
                "Line {line} has {} fields but the header has {}.",
                record.len(),
                headers.len()
            )));
        }

        entities.push(record.get(0).unwrap_or_default().to_string());
        for (col, cells) in values.iter_mut().enumerate() {
            cells.push(parse_cell(record.get(col + 1)));
        }
    }

    let mut names = headers.into_iter();
    let id_name = names.next().unwrap_or_default();
    let columns = names
        .zip(values)
        .map(|(name, cells)| NumericColumn::new(name, cells))
        .collect::<Vec<_>>();

    for column in &columns {
        let missing = column.missing_count();
        if missing > 0 {
            debug!("column `{}`: {missing} missing cell(s)", column.name);
        }
    }

    Table::new(id_name, entities, columns)
}

fn normalize_headers(headers: &StringRecord) -> Vec<String> {
    // A single empty field is what the reader reports for an empty stream.
    if headers.len() == 1 && headers.get(0).is_some_and(|h| h.trim().is_empty()) {
        return Vec::new();
    }
    headers.iter().map(normalize_header_name).collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, column lookups by name fail.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_unique_headers(headers: &[String]) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    for name in headers {
        if !seen.insert(name.as_str()) {
            return Err(AnalysisError::Schema(format!("Duplicate column: `{name}`")));
        }
    }
    Ok(())
}

/// Coerce one year cell. Anything that is not a finite number is missing.
fn parse_cell(s: Option<&str>) -> Option<f64> {
    let s = s.map(str::trim).filter(|s| !s.is_empty())?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
