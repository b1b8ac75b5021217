//! Anchor scheduler. Decides which pair the rater sees next.
//!
//! One item at a time is the *anchor*. Only pairs touching the anchor are
//! offered until none remain, then the next item in catalog order with work
//! left becomes the anchor. When no pairs remain at all the scheduler is
//! done.
//!
//! ```text
//!   NoAnchor ──(remaining ≠ ∅)──▶ AnchorActive(x) ──(subset(x) = ∅)──▶ AnchorActive(y)
//!       │                              │                                   │
//!       └────────(remaining = ∅)───────┴──────────────▶ AllDone ◀──────────┘
//! ```
//!
//! AllDone is left again only when a recompute finds work, e.g. after items
//! are reinstated or added.

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
  catalog::{Catalog, Item},
  pair::Pair,
  remaining::RemainingSet,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "anchor", rename_all = "snake_case")]
pub enum SchedulerState {
  NoAnchor,
  AnchorActive(Item),
  AllDone,
}

/// Session-local scheduling state.
#[derive(Debug, Clone, Default)]
pub struct AnchorCursor {
  anchor:    Option<Item>,
  displayed: Option<Pair>,
  done:      bool,
}

impl AnchorCursor {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> SchedulerState {
    match (&self.anchor, self.done) {
      (_, true) => SchedulerState::AllDone,
      (Some(a), false) => SchedulerState::AnchorActive(a.clone()),
      (None, false) => SchedulerState::NoAnchor,
    }
  }

  pub fn anchor(&self) -> Option<&Item> { self.anchor.as_ref() }

  pub fn displayed(&self) -> Option<&Pair> { self.displayed.as_ref() }

  /// The displayed pair with the anchor first.
  pub fn oriented(&self) -> Option<(&Item, &Item)> {
    let pair = self.displayed.as_ref()?;
    let anchor = self.anchor.as_ref()?;
    Some((anchor, pair.other(anchor)?))
  }

  pub fn is_done(&self) -> bool { self.done }

  /// Forget the displayed pair so the next evaluation draws a new one.
  pub fn clear_displayed(&mut self) -> Option<Pair> { self.displayed.take() }

  /// Bring the cursor in line with `remaining`.
  ///
  /// Picks an anchor if there is none, moves on from an exhausted or retired
  /// anchor, and draws a pair if none is displayed. A displayed pair that is
  /// still remaining is left alone.
  pub fn evaluate<R>(&mut self, remaining: &RemainingSet, catalog: &Catalog, rng: &mut R)
  where
    R: Rng + ?Sized,
  {
    if let Some(anchor) = &self.anchor
      && !catalog.is_active(anchor)
    {
      tracing::info!(%anchor, "anchor retired; dropping it");
      self.anchor = None;
      self.displayed = None;
    }
    if let Some(pair) = &self.displayed
      && !remaining.contains(pair)
    {
      self.displayed = None;
    }

    let Some(first) = remaining.pairs().first() else {
      if !self.done {
        tracing::info!(total = remaining.total_count(), "every pair has been rated");
      }
      self.anchor = None;
      self.displayed = None;
      self.done = true;
      return;
    };
    self.done = false;

    let anchor = match self.anchor.take() {
      None => {
        tracing::info!(anchor = %first.first, "anchor selected");
        first.first.clone()
      }
      Some(current) if remaining.count_for(&current) > 0 => current,
      Some(exhausted) => {
        self.displayed = None;
        let Some(next) = next_anchor(remaining, catalog) else {
          self.done = true;
          return;
        };
        tracing::info!(from = %exhausted, to = %next, "anchor exhausted; switching");
        next
      }
    };

    if self.displayed.is_none() {
      self.displayed = draw(remaining, &anchor, None, rng);
      if let Some(pair) = &self.displayed {
        tracing::debug!(first = %pair.first, second = %pair.second, "pair drawn");
      }
    }
    self.anchor = Some(anchor);
  }

  /// Discard the displayed pair without recording anything and draw another
  /// from the anchor's subset, avoiding the skipped pair if possible.
  pub fn skip<R>(&mut self, remaining: &RemainingSet, rng: &mut R)
  where
    R: Rng + ?Sized,
  {
    let skipped = self.displayed.take();
    if let Some(anchor) = &self.anchor {
      self.displayed = draw(remaining, anchor, skipped.as_ref(), rng).or(skipped);
    }
  }
}

/// First active item in catalog order that still has a remaining pair.
fn next_anchor(remaining: &RemainingSet, catalog: &Catalog) -> Option<Item> {
  catalog
    .active()
    .into_iter()
    .find(|item| remaining.count_for(item) > 0)
}

/// Uniformly random remaining pair touching `anchor`, preferring anything
/// other than `avoid`.
fn draw<R>(
  remaining: &RemainingSet,
  anchor: &Item,
  avoid: Option<&Pair>,
  rng: &mut R,
) -> Option<Pair>
where
  R: Rng + ?Sized,
{
  let subset: Vec<&Pair> = remaining
    .for_item(anchor)
    .filter(|p| Some(*p) != avoid)
    .collect();
  subset.choose(rng).map(|p| (*p).clone())
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;
  use crate::{answer::Answer, pair::all_pairs};

  fn item(s: &str) -> Item { Item::parse(s).unwrap() }

  fn remaining_for(catalog: &Catalog, answered: &[(&str, &str)]) -> RemainingSet {
    let answers: Vec<Answer> = answered
      .iter()
      .map(|(a, b)| Answer {
        pair:       Pair::new(item(a), item(b)).unwrap(),
        score:      "3".into(),
        written_at: None,
      })
      .collect();
    RemainingSet::compute(&all_pairs(&catalog.active()), &answers)
  }

  #[test]
  fn first_evaluation_anchors_on_first_remaining_pair() {
    let catalog = Catalog::load(["A", "B", "C"]);
    let remaining = remaining_for(&catalog, &[("A", "B"), ("A", "C")]);
    let mut cursor = AnchorCursor::new();
    cursor.evaluate(&remaining, &catalog, &mut StdRng::seed_from_u64(1));

    assert_eq!(cursor.state(), SchedulerState::AnchorActive(item("B")));
    assert_eq!(cursor.oriented(), Some((&item("B"), &item("C"))));
  }

  #[test]
  fn displayed_pair_is_stable_across_evaluations() {
    let catalog = Catalog::load(["A", "B", "C", "D", "E"]);
    let remaining = remaining_for(&catalog, &[]);
    let mut rng = StdRng::seed_from_u64(7);
    let mut cursor = AnchorCursor::new();

    cursor.evaluate(&remaining, &catalog, &mut rng);
    let shown = cursor.displayed().cloned();
    for _ in 0..10 {
      cursor.evaluate(&remaining, &catalog, &mut rng);
    }
    assert_eq!(cursor.displayed().cloned(), shown);
  }

  #[test]
  fn anchor_is_always_rendered_first() {
    let catalog = Catalog::load(["A", "B", "C", "D"]);
    let remaining = remaining_for(&catalog, &[("A", "B"), ("A", "C"), ("A", "D")]);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..20 {
      let mut cursor = AnchorCursor::new();
      cursor.evaluate(&remaining, &catalog, &mut rng);
      let (anchor, _) = cursor.oriented().unwrap();
      assert_eq!(anchor, &item("B"));
    }
  }

  #[test]
  fn exhausted_anchor_moves_to_next_item_in_catalog_order() {
    let catalog = Catalog::load(["A", "B", "C", "D"]);
    let mut rng = StdRng::seed_from_u64(11);
    let mut cursor = AnchorCursor::new();

    let remaining = remaining_for(&catalog, &[]);
    cursor.evaluate(&remaining, &catalog, &mut rng);
    assert_eq!(cursor.anchor(), Some(&item("A")));

    let remaining = remaining_for(&catalog, &[("A", "B"), ("A", "C"), ("A", "D"), ("B", "C")]);
    cursor.evaluate(&remaining, &catalog, &mut rng);
    assert_eq!(cursor.anchor(), Some(&item("B")));
    assert_eq!(cursor.oriented(), Some((&item("B"), &item("D"))));
  }

  #[test]
  fn anchors_never_revisit_exhausted_items() {
    let catalog = Catalog::load(["A", "B", "C", "D", "E"]);
    let mut rng = StdRng::seed_from_u64(5);
    let mut cursor = AnchorCursor::new();
    let mut remaining = remaining_for(&catalog, &[]);
    let mut exhausted: Vec<Item> = Vec::new();
    let mut last_anchor: Option<Item> = None;

    loop {
      cursor.evaluate(&remaining, &catalog, &mut rng);
      if cursor.is_done() {
        break;
      }
      let anchor = cursor.anchor().cloned().unwrap();
      if let Some(prev) = last_anchor.replace(anchor.clone())
        && prev != anchor
      {
        exhausted.push(prev);
      }
      assert!(!exhausted.contains(&anchor));

      let pair = cursor.clear_displayed().unwrap();
      assert!(pair.contains(&anchor));
      assert!(remaining.mark_answered(&pair));
    }
    assert!(remaining.is_empty());
    assert_eq!(cursor.state(), SchedulerState::AllDone);
  }

  #[test]
  fn all_done_is_left_when_work_reappears() {
    let mut catalog = Catalog::load(["A", "B"]);
    let mut rng = StdRng::seed_from_u64(2);
    let mut cursor = AnchorCursor::new();

    cursor.evaluate(&remaining_for(&catalog, &[("A", "B")]), &catalog, &mut rng);
    assert_eq!(cursor.state(), SchedulerState::AllDone);
    assert!(cursor.displayed().is_none());

    catalog.extend(["C"]);
    cursor.evaluate(&remaining_for(&catalog, &[("A", "B")]), &catalog, &mut rng);
    assert_eq!(cursor.state(), SchedulerState::AnchorActive(item("A")));
    assert_eq!(cursor.oriented(), Some((&item("A"), &item("C"))));
  }

  #[test]
  fn retiring_the_anchor_drops_it() {
    let mut catalog = Catalog::load(["A", "B", "C"]);
    let mut rng = StdRng::seed_from_u64(9);
    let mut cursor = AnchorCursor::new();
    cursor.evaluate(&remaining_for(&catalog, &[]), &catalog, &mut rng);
    assert_eq!(cursor.anchor(), Some(&item("A")));

    catalog.retire(["A"]);
    cursor.evaluate(&remaining_for(&catalog, &[]), &catalog, &mut rng);
    assert_eq!(cursor.anchor(), Some(&item("B")));
    assert_eq!(cursor.oriented(), Some((&item("B"), &item("C"))));
  }

  #[test]
  fn skip_prefers_a_different_pair() {
    let catalog = Catalog::load(["A", "B", "C"]);
    let remaining = remaining_for(&catalog, &[]);
    let mut rng = StdRng::seed_from_u64(4);
    let mut cursor = AnchorCursor::new();
    cursor.evaluate(&remaining, &catalog, &mut rng);

    for _ in 0..10 {
      let before = cursor.displayed().cloned().unwrap();
      cursor.skip(&remaining, &mut rng);
      let after = cursor.displayed().cloned().unwrap();
      assert_ne!(before, after);
      assert!(after.contains(&item("A")));
    }
  }

  #[test]
  fn skip_with_single_candidate_keeps_it() {
    let catalog = Catalog::load(["A", "B"]);
    let remaining = remaining_for(&catalog, &[]);
    let mut rng = StdRng::seed_from_u64(4);
    let mut cursor = AnchorCursor::new();
    cursor.evaluate(&remaining, &catalog, &mut rng);

    let before = cursor.displayed().cloned();
    cursor.skip(&remaining, &mut rng);
    assert_eq!(cursor.displayed().cloned(), before);
  }
}
