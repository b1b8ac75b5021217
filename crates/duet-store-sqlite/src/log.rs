//! [`SqliteLog`]: the SQLite implementation of [`AnswerLog`].

use std::path::Path;

use chrono::Utc;
use duet_core::{answer::LogRow, log::AnswerLog};

use crate::{
  Result,
  encode::{RawLogRow, encode_cells, encode_dt},
  schema::SCHEMA,
};

// ─── Log ─────────────────────────────────────────────────────────────────────

/// An answer log backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteLog {
  conn: tokio_rusqlite::Connection,
}

impl SqliteLog {
  /// Open (or create) a log at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let log = Self { conn };
    log.init_schema().await?;
    Ok(log)
  }

  /// Open an in-memory log, used in tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let log = Self { conn };
    log.init_schema().await?;
    Ok(log)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored rows, header included.
  pub async fn row_count(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM log_rows", [], |r| r.get(0))?)
      })
      .await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }

  /// Insert encoded rows in one transaction, optionally wiping the table
  /// first.
  async fn insert(&self, rows: Vec<Vec<String>>, reset: bool) -> Result<()> {
    let at_str = encode_dt(Utc::now());
    let encoded = rows
      .iter()
      .map(|cells| encode_cells(cells))
      .collect::<Result<Vec<_>>>()?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if reset {
          tx.execute("DELETE FROM log_rows", [])?;
        }
        {
          let mut stmt = tx.prepare(
            "INSERT INTO log_rows (cells_json, appended_at) VALUES (?1, ?2)",
          )?;
          for cells_json in &encoded {
            stmt.execute(rusqlite::params![cells_json, at_str])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AnswerLog impl ──────────────────────────────────────────────────────────

impl AnswerLog for SqliteLog {
  type Error = crate::Error;

  async fn read_all(&self) -> Result<Vec<LogRow>> {
    let raws: Vec<RawLogRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT cells_json, appended_at FROM log_rows ORDER BY seq")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawLogRow {
              cells_json:  row.get(0)?,
              appended_at: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLogRow::into_row).collect()
  }

  async fn append_row(&self, cells: Vec<String>) -> Result<()> {
    self.insert(vec![cells], false).await
  }

  async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<()> {
    if rows.is_empty() {
      return Ok(());
    }
    self.insert(rows, false).await
  }

  async fn clear_and_reset(&self, header: Vec<String>) -> Result<()> {
    tracing::warn!(?header, "resetting answer log");
    self.insert(vec![header], true).await
  }
}
