//! Answer log reader. Turns raw log rows into [`Answer`]s.
//!
//! Parsing anomalies are absorbed here, as close to the row as possible:
//!
//! - an empty log gets the canonical header written once and reads as empty;
//! - an unrecognised header puts the reader in degraded mode (no answers);
//! - short or malformed rows are skipped one by one;
//! - rows naming a retired item are dropped from the result but stay in the
//!   log.
//!
//! Only a failing backend produces an error.

use crate::{
  Error, Result,
  answer::{Answer, CANONICAL_HEADER, LogRow, canonical_header},
  catalog::{Catalog, Item},
  log::AnswerLog,
  pair::Pair,
};

// ─── Column mapping ──────────────────────────────────────────────────────────

/// Accepted names per logical column, compared case-insensitively.
const ITEM1_NAMES: [&str; 2] = ["item1", "product1"];
const ITEM2_NAMES: [&str; 2] = ["item2", "product2"];
const SCORE_NAMES: [&str; 2] = ["score", "tastescore"];

/// Where each logical column lives in a log's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
  pub item1: usize,
  pub item2: usize,
  pub score: usize,
}

impl ColumnMap {
  pub const CANONICAL: Self = Self { item1: 0, item2: 1, score: 2 };

  /// Rows narrower than this cannot be mapped.
  pub fn min_width(&self) -> usize {
    self.item1.max(self.item2).max(self.score) + 1
  }

  pub fn is_canonical(&self) -> bool { *self == Self::CANONICAL }

  /// Pull `(item1, item2, score)` out of a row.
  pub fn extract<'a>(&self, cells: &'a [String]) -> Option<(&'a str, &'a str, &'a str)> {
    if cells.len() < self.min_width() {
      return None;
    }
    Some((&cells[self.item1], &cells[self.item2], &cells[self.score]))
  }

  /// Lay out `(item1, item2, score)` in this mapping's columns. Columns the
  /// mapping does not use are left blank.
  pub fn arrange(&self, item1: &str, item2: &str, score: &str) -> Vec<String> {
    let mut cells = vec![String::new(); self.min_width()];
    cells[self.item1] = item1.to_owned();
    cells[self.item2] = item2.to_owned();
    cells[self.score] = score.to_owned();
    cells
  }
}

/// Map a header row to column positions by name.
///
/// Pure: never touches the log. Returns `None` when any of the three columns
/// cannot be found.
pub fn map_columns(header: &[String]) -> Option<ColumnMap> {
  let find = |names: &[&str]| {
    header.iter().position(|cell| {
      let cell = cell.trim();
      names.iter().any(|n| cell.eq_ignore_ascii_case(n))
    })
  };

  let map = ColumnMap {
    item1: find(&ITEM1_NAMES)?,
    item2: find(&ITEM2_NAMES)?,
    score: find(&SCORE_NAMES)?,
  };
  (map.item1 != map.item2).then_some(map)
}

/// `true` if `header` is exactly the canonical header.
pub fn is_canonical_header(header: &[String]) -> bool {
  header.len() == CANONICAL_HEADER.len()
    && header.iter().zip(CANONICAL_HEADER).all(|(h, c)| h == c)
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// How the header was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
  /// The log was empty and has just been initialised.
  Bootstrapped,
  Canonical,
  /// A non-canonical header whose columns could be found by name.
  Mapped(ColumnMap),
  /// No usable mapping; the log is treated as empty.
  Unrecognized,
}

/// Result of one pass over the log.
#[derive(Debug, Clone)]
pub struct ReadReport {
  pub header:           HeaderStatus,
  /// Answers about items that are not retired, in log order.
  pub answers:          Vec<Answer>,
  /// Data rows in the log (excluding the header).
  pub data_rows:        usize,
  /// Rows too short, blank, or naming the same item twice.
  pub skipped_rows:     usize,
  /// Rows dropped because they mention a retired item.
  pub excluded_retired: usize,
}

impl ReadReport {
  fn empty(header: HeaderStatus, data_rows: usize) -> Self {
    Self {
      header,
      answers: Vec::new(),
      data_rows,
      skipped_rows: 0,
      excluded_retired: 0,
    }
  }
}

// ─── Reading ─────────────────────────────────────────────────────────────────

/// Read and normalise every answer in `log`.
///
/// Writes to the log only to bootstrap an empty one with the canonical
/// header.
pub async fn read_answers<L: AnswerLog>(log: &L, catalog: &Catalog) -> Result<ReadReport> {
  let rows = log.read_all().await.map_err(Error::log)?;

  let Some((header, data)) = rows.split_first() else {
    tracing::info!("answer log is empty; writing canonical header");
    log.append_row(canonical_header()).await.map_err(Error::log)?;
    return Ok(ReadReport::empty(HeaderStatus::Bootstrapped, 0));
  };

  Ok(parse_rows(&header.cells, data, catalog))
}

/// Interpret already-fetched rows. `header` is the first log row.
pub fn parse_rows(header: &[String], data: &[LogRow], catalog: &Catalog) -> ReadReport {
  let (status, map) = if is_canonical_header(header) {
    (HeaderStatus::Canonical, ColumnMap::CANONICAL)
  } else if let Some(map) = map_columns(header) {
    tracing::debug!(?map, "non-canonical log header mapped by name");
    (HeaderStatus::Mapped(map), map)
  } else {
    tracing::warn!(
      ?header,
      "answer log header not recognised; treating the log as empty"
    );
    return ReadReport::empty(HeaderStatus::Unrecognized, data.len());
  };

  let mut report = ReadReport::empty(status, data.len());

  for (idx, row) in data.iter().enumerate() {
    let Some(pair) = row_pair(&map, row) else {
      // +2: one for the header, one for 1-based numbering.
      tracing::debug!(row = idx + 2, cells = ?row.cells, "skipping malformed log row");
      report.skipped_rows += 1;
      continue;
    };

    if catalog.is_retired(&pair.first) || catalog.is_retired(&pair.second) {
      report.excluded_retired += 1;
      continue;
    }

    let score = row.cells[map.score].clone();
    report.answers.push(Answer { pair, score, written_at: row.appended_at });
  }

  tracing::debug!(
    answers = report.answers.len(),
    skipped = report.skipped_rows,
    retired = report.excluded_retired,
    "answer log read"
  );
  report
}

// ─── Migration ───────────────────────────────────────────────────────────────

/// A mapped log rewritten into canonical column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
  /// Canonical header followed by every readable data row.
  pub rows:    Vec<Vec<String>>,
  /// Rows too narrow for the mapping.
  pub dropped: usize,
}

/// Re-order the columns of a log whose header was [`HeaderStatus::Mapped`].
///
/// Returns `None` for a canonical or unrecognised header: there is nothing
/// to migrate. Extra columns are discarded.
pub fn canonicalize(header: &[String], data: &[LogRow]) -> Option<Migration> {
  if is_canonical_header(header) {
    return None;
  }
  let map = map_columns(header)?;

  let mut rows = vec![canonical_header()];
  let mut dropped = 0;
  for row in data {
    match map.extract(&row.cells) {
      Some((a, b, score)) => rows.push(vec![a.to_owned(), b.to_owned(), score.to_owned()]),
      None => dropped += 1,
    }
  }
  Some(Migration { rows, dropped })
}

fn row_pair(map: &ColumnMap, row: &LogRow) -> Option<Pair> {
  let (a, b, _) = map.extract(&row.cells)?;
  Pair::new(Item::parse(a)?, Item::parse(b)?)
}
