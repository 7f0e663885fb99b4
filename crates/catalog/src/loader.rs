//! Tolerant delimited-file loader. Vendor exports disagree on
//! delimiter and quoting, so parsing is attempted in stages and a
//! missing file is an empty result rather than an error — the caller
//! decides whether an empty catalog is fatal.

use mediaplan_core::PlanResult;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// One untyped catalog row: header -> cell, both as read.
pub type RawRow = HashMap<String, String>;

/// Load one delimited file into raw rows.
///
/// The delimiter is auto-detected between `,` and `;` by counting
/// occurrences in the header line. If naive parsing produces a single
/// column (quoting gone wrong), the file is re-parsed with all `"`
/// characters stripped.
pub fn load_raw_rows(path: impl AsRef<Path>) -> PlanResult<Vec<RawRow>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "catalog file missing, treating as empty");
        return Ok(Vec::new());
    }

    let raw = std::fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        warn!(path = %path.display(), "catalog file empty");
        return Ok(Vec::new());
    }

    let delimiter = detect_delimiter(&raw);
    if let Ok(rows) = parse_rows(&raw, delimiter) {
        if wide_enough(&rows) {
            debug!(path = %path.display(), rows = rows.len(), "catalog file loaded");
            return Ok(rows);
        }
    }

    // Fallback: strip quotes and retry (mirrors the loose loader the
    // dashboard always shipped with).
    let stripped = raw.replace('"', "");
    let rows = parse_rows(&stripped, detect_delimiter(&stripped))?;
    debug!(path = %path.display(), rows = rows.len(), "catalog file loaded after quote stripping");
    Ok(rows)
}

fn detect_delimiter(raw: &str) -> u8 {
    let header = raw.lines().next().unwrap_or_default();
    let commas = header.matches(',').count();
    let semis = header.matches(';').count();
    if semis > commas {
        b';'
    } else {
        b','
    }
}

/// A parse attempt only counts if at least one row has more than one
/// column.
fn wide_enough(rows: &[RawRow]) -> bool {
    rows.iter().any(|r| r.len() > 1)
}

fn parse_rows(raw: &str, delimiter: u8) -> PlanResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (i, field) in record.iter().enumerate() {
            if let Some(name) = headers.get(i) {
                if !name.is_empty() {
                    row.insert(name.clone(), field.to_string());
                }
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}
