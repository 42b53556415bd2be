//! Shared CSV helpers for reference files.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;

use crate::error::{Result, StandardsError};

pub(crate) type Row = BTreeMap<String, String>;

/// Read a CSV file into row maps keyed by trimmed header.
///
/// Returns `(line, row)` pairs where `line` is the 1-based file line.
pub(crate) fn read_csv_rows(path: &Path) -> Result<Vec<(usize, Row)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| StandardsError::csv(path, &e))?;

    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(path, &e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StandardsError::csv(path, &e))?;
        let line = record.position().map_or(0, |pos| pos.line() as usize);
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .trim()
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push((line, row));
    }
    Ok(rows)
}

pub(crate) fn get_field(row: &Row, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

pub(crate) fn get_optional(row: &Row, key: &str) -> Option<String> {
    row.get(key).filter(|v| !v.is_empty()).cloned()
}

/// Parse a required `YYYY-MM-DD` column.
pub(crate) fn get_date(path: &Path, line: usize, row: &Row, key: &str) -> Result<NaiveDate> {
    let raw = get_field(row, key);
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| StandardsError::record(path, line, format!("{key} `{raw}`: {e}")))
}

pub(crate) fn get_optional_date(
    path: &Path,
    line: usize,
    row: &Row,
    key: &str,
) -> Result<Option<NaiveDate>> {
    match get_optional(row, key) {
        Some(_) => get_date(path, line, row, key).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn get_i32(path: &Path, line: usize, row: &Row, key: &str) -> Result<i32> {
    let raw = get_field(row, key);
    raw.parse::<i32>()
        .map_err(|e| StandardsError::record(path, line, format!("{key} `{raw}`: {e}")))
}
