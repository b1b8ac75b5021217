//! A rating session, the state one rater works against.
//!
//! The session owns the catalog, the anchor cursor and the last computed
//! remaining set, and talks to an [`AnswerLog`]. Every write is applied
//! locally before the log is re-read, so a submitted pair is never offered
//! again within the session even if the re-read fails.

use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  answer::{Answer, Score, answer_cells},
  catalog::{Catalog, Item},
  log::AnswerLog,
  pair::all_pairs,
  reader::{ColumnMap, HeaderStatus, read_answers},
  remaining::{Progress, RemainingSet},
  scheduler::{AnchorCursor, SchedulerState},
};

/// What the presentation layer should show next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentation {
  /// Ask for a rating of `anchor_item` + `other_item`.
  Pair {
    anchor_item:     Item,
    other_item:      Item,
    anchor_progress: Progress,
    global_progress: Progress,
  },
  /// Every pair of the active catalog has been rated.
  Done { global_progress: Progress },
}

pub struct Session<L> {
  id:        Uuid,
  log:       L,
  catalog:   Catalog,
  cursor:    AnchorCursor,
  remaining: RemainingSet,
  header:    Option<HeaderStatus>,
  rng:       StdRng,
}

impl<L: AnswerLog> Session<L> {
  /// Start a session and read the log once.
  pub async fn open(log: L, catalog: Catalog) -> Result<Self> {
    Self::open_with_rng(log, catalog, StdRng::from_os_rng()).await
  }

  /// Like [`open`](Self::open) with a caller-supplied random source, so pair
  /// draws can be reproduced.
  pub async fn open_with_rng(log: L, catalog: Catalog, rng: StdRng) -> Result<Self> {
    let mut session = Self {
      id: Uuid::new_v4(),
      log,
      catalog,
      cursor: AnchorCursor::new(),
      remaining: RemainingSet::default(),
      header: None,
      rng,
    };
    tracing::info!(
      session = %session.id,
      items = session.catalog.active_len(),
      "opening rating session"
    );
    session.refresh().await?;
    Ok(session)
  }

  /// Re-read the log and recompute the remaining set and the cursor.
  ///
  /// On error nothing in the session changes.
  #[tracing::instrument(skip_all, fields(session = %self.id))]
  pub async fn refresh(&mut self) -> Result<()> {
    let report = read_answers(&self.log, &self.catalog).await?;
    let space = all_pairs(&self.catalog.active());
    self.remaining = RemainingSet::compute(&space, &report.answers);
    self.header = Some(report.header);
    self.cursor.evaluate(&self.remaining, &self.catalog, &mut self.rng);
    tracing::debug!(
      answered = self.remaining.answered_count(),
      total = self.remaining.total_count(),
      "progress recomputed"
    );
    Ok(())
  }

  // ── Presentation boundary ─────────────────────────────────────────────────

  pub fn current_display(&self) -> Presentation {
    let global_progress = self.global_progress();
    match (self.cursor.oriented(), self.anchor_progress()) {
      (Some((anchor, other)), Some(anchor_progress)) => Presentation::Pair {
        anchor_item: anchor.clone(),
        other_item: other.clone(),
        anchor_progress,
        global_progress,
      },
      _ => Presentation::Done { global_progress },
    }
  }

  /// Record `score` for the displayed pair and move on.
  ///
  /// The row is written in the column layout found on the last read. If the
  /// append fails, the same pair stays displayed and the error is returned
  /// untouched.
  #[tracing::instrument(skip(self), fields(session = %self.id))]
  pub async fn submit(&mut self, score: i64) -> Result<Answer> {
    let score = Score::new(score)?;
    let pair = self.cursor.displayed().cloned().ok_or(Error::NothingToRate)?;
    let layout = self.write_layout()?;

    self
      .log
      .append_row(answer_cells(&pair, score, &layout))
      .await
      .map_err(Error::log)?;
    tracing::info!(first = %pair.first, second = %pair.second, score = score.get(), "answer recorded");

    self.remaining.mark_answered(&pair);
    self.cursor.clear_displayed();
    self.cursor.evaluate(&self.remaining, &self.catalog, &mut self.rng);

    let answer = Answer {
      pair,
      score: score.get().to_string(),
      written_at: Some(Utc::now()),
    };
    self.refresh().await?;
    Ok(answer)
  }

  /// Columns a new answer must occupy to be read back.
  fn write_layout(&self) -> Result<ColumnMap> {
    match self.header {
      None | Some(HeaderStatus::Bootstrapped | HeaderStatus::Canonical) => {
        Ok(ColumnMap::CANONICAL)
      }
      Some(HeaderStatus::Mapped(map)) => Ok(map),
      Some(HeaderStatus::Unrecognized) => {
        tracing::warn!(session = %self.id, "log header unrecognised; not appending");
        Err(Error::UnrecognizedHeader)
      }
    }
  }

  /// Show a different pair without recording anything.
  pub fn skip(&mut self) {
    self.cursor.skip(&self.remaining, &mut self.rng);
    tracing::debug!(session = %self.id, "pair skipped");
  }

  /// Retire items and recompute. Unknown names are ignored.
  pub async fn on_catalog_change<I, S>(&mut self, retired: I) -> Result<Vec<Item>>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let changed = self.catalog.retire(retired);
    self.after_catalog_change("retired", &changed).await?;
    Ok(changed)
  }

  /// Return retired items to the active universe and recompute.
  pub async fn reinstate<I, S>(&mut self, items: I) -> Result<Vec<Item>>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let changed = self.catalog.reinstate(items);
    self.after_catalog_change("reinstated", &changed).await?;
    Ok(changed)
  }

  /// Add new items to the catalog and recompute.
  pub async fn extend<I, S>(&mut self, items: I) -> Result<Vec<Item>>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let added = self.catalog.extend(items);
    self.after_catalog_change("added", &added).await?;
    Ok(added)
  }

  async fn after_catalog_change(&mut self, what: &str, changed: &[Item]) -> Result<()> {
    if changed.is_empty() {
      return Ok(());
    }
    tracing::info!(session = %self.id, ?changed, "catalog items {what}");
    self.refresh().await
  }

  // ── Progress ──────────────────────────────────────────────────────────────

  pub fn global_progress(&self) -> Progress { self.remaining.progress() }

  /// Progress of the current anchor against every other active item.
  pub fn anchor_progress(&self) -> Option<Progress> {
    let anchor = self.cursor.anchor()?;
    let total = self.catalog.active_len().saturating_sub(1);
    let left = self.remaining.count_for(anchor);
    Some(Progress { answered: total.saturating_sub(left), total })
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn id(&self) -> Uuid { self.id }

  pub fn state(&self) -> SchedulerState { self.cursor.state() }

  pub fn catalog(&self) -> &Catalog { &self.catalog }

  pub fn remaining(&self) -> &RemainingSet { &self.remaining }

  /// How the log header was interpreted on the last read.
  pub fn header_status(&self) -> Option<HeaderStatus> { self.header }

  pub fn log(&self) -> &L { &self.log }
}
