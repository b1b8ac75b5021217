//! The `AnswerLog` trait and an in-process implementation.
//!
//! The trait is implemented by storage backends (e.g. `duet-store-sqlite`).
//! The session depends on this abstraction, not on any concrete backend.

use std::{
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex},
};

use chrono::Utc;

use crate::answer::LogRow;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// An append-only, key-less table of string rows. The first row is the
/// header.
///
/// Rows are never updated or deleted individually. The only destructive
/// operation is [`clear_and_reset`](AnswerLog::clear_and_reset), which the
/// engine itself never calls.
pub trait AnswerLog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every row in append order, header included.
  fn read_all(
    &self,
  ) -> impl Future<Output = Result<Vec<LogRow>, Self::Error>> + Send + '_;

  /// Append one row. The backend stamps `appended_at`.
  fn append_row(
    &self,
    cells: Vec<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Append several rows in order.
  fn append_rows(
    &self,
    rows: Vec<Vec<String>>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Drop every row and start over with `header` as the only row.
  fn clear_and_reset(
    &self,
    header: Vec<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── MemoryLog ───────────────────────────────────────────────────────────────

/// A log held in process memory. Cloning shares the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
  rows: Arc<Mutex<Vec<LogRow>>>,
}

impl MemoryLog {
  pub fn new() -> Self { Self::default() }

  /// Seed a log with raw rows (header first), e.g. a legacy export.
  pub fn with_rows<I>(rows: I) -> Self
  where
    I: IntoIterator<Item = Vec<String>>,
  {
    let log = Self::new();
    log.lock().extend(rows.into_iter().map(LogRow::new));
    log
  }

  pub fn len(&self) -> usize { self.lock().len() }

  pub fn is_empty(&self) -> bool { self.lock().is_empty() }

  fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogRow>> {
    // A poisoned lock still holds a consistent Vec; rows are only pushed.
    self.rows.lock().unwrap_or_else(|e| e.into_inner())
  }

  fn push(&self, cells: Vec<String>) {
    self.lock().push(LogRow { cells, appended_at: Some(Utc::now()) });
  }
}

impl AnswerLog for MemoryLog {
  type Error = Infallible;

  async fn read_all(&self) -> Result<Vec<LogRow>, Infallible> {
    Ok(self.lock().clone())
  }

  async fn append_row(&self, cells: Vec<String>) -> Result<(), Infallible> {
    self.push(cells);
    Ok(())
  }

  async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), Infallible> {
    for cells in rows {
      self.push(cells);
    }
    Ok(())
  }

  async fn clear_and_reset(&self, header: Vec<String>) -> Result<(), Infallible> {
    let mut rows = self.lock();
    rows.clear();
    rows.push(LogRow { cells: header, appended_at: Some(Utc::now()) });
    Ok(())
  }
}
