//! Encoding and decoding helpers between log rows and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, cells as a compact JSON array.

use chrono::{DateTime, Utc};
use duet_core::answer::LogRow;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Cells ───────────────────────────────────────────────────────────────────

pub fn encode_cells(cells: &[String]) -> Result<String> {
  Ok(serde_json::to_string(cells)?)
}

pub fn decode_cells(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read directly from a `log_rows` row.
pub struct RawLogRow {
  pub cells_json:  String,
  pub appended_at: String,
}

impl RawLogRow {
  pub fn into_row(self) -> Result<LogRow> {
    Ok(LogRow {
      cells:       decode_cells(&self.cells_json)?,
      appended_at: Some(decode_dt(&self.appended_at)?),
    })
  }
}
