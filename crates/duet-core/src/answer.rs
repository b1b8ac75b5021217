//! Answers: immutable ratings of a pair.
//!
//! An answer is written once, as a single row of the answer log, and never
//! updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, pair::Pair, reader::ColumnMap};

/// Column names of a freshly initialised log.
pub const CANONICAL_HEADER: [&str; 3] = ["Item1", "Item2", "Score"];

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

// ─── Score ───────────────────────────────────────────────────────────────────

/// A validated rating in `MIN_SCORE..=MAX_SCORE`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
  pub fn new(value: i64) -> Result<Self> {
    if (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(&value) {
      Ok(Self(value as u8))
    } else {
      Err(Error::ScoreOutOfRange(value))
    }
  }

  pub fn get(self) -> u8 { self.0 }

  /// Short description shown next to the number when prompting.
  pub fn label(self) -> &'static str {
    match self.0 {
      1 => "disgusting",
      2 => "bad",
      3 => "okay",
      4 => "good",
      _ => "excellent",
    }
  }
}

impl TryFrom<i64> for Score {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> { Self::new(value) }
}

impl From<Score> for u8 {
  fn from(s: Score) -> Self { s.0 }
}

// ─── Answer ──────────────────────────────────────────────────────────────────

/// A rating read back from the log.
///
/// The score cell is kept verbatim. Whether it is a valid score does not
/// affect whether the pair counts as answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
  pub pair:       Pair,
  pub score:      String,
  /// When the row was appended, if the backend records it.
  pub written_at: Option<DateTime<Utc>>,
}

impl Answer {
  /// The score, if the cell holds an integer in range.
  pub fn score_value(&self) -> Option<Score> {
    self.score.trim().parse::<i64>().ok().and_then(|v| Score::new(v).ok())
  }
}

// ─── Log rows ────────────────────────────────────────────────────────────────

/// One raw row of the answer log, header included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRow {
  pub cells:       Vec<String>,
  pub appended_at: Option<DateTime<Utc>>,
}

impl LogRow {
  pub fn new(cells: Vec<String>) -> Self {
    Self { cells, appended_at: None }
  }
}

/// Cells for a newly submitted answer, placed in the columns `layout` reads
/// them from.
pub fn answer_cells(pair: &Pair, score: Score, layout: &ColumnMap) -> Vec<String> {
  layout.arrange(pair.first.as_str(), pair.second.as_str(), &score.get().to_string())
}

pub fn canonical_header() -> Vec<String> {
  CANONICAL_HEADER.iter().map(|s| (*s).to_owned()).collect()
}
