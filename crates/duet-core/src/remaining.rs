//! Remaining-pair resolution and global progress.
//!
//! The remaining set is never persisted. It is recomputed from the pair space
//! and the answers every time the log is read.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{answer::Answer, catalog::Item, pair::Pair};

/// `answered / total` counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
  pub answered: usize,
  pub total:    usize,
}

impl Progress {
  /// Fraction complete; `0.0` when there is nothing to do.
  pub fn ratio(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      self.answered as f64 / self.total as f64
    }
  }
}

/// Unanswered pairs of the current pair space, in generation order.
#[derive(Debug, Clone, Default)]
pub struct RemainingSet {
  pairs: Vec<Pair>,
  total: usize,
}

impl RemainingSet {
  /// `all_pairs` minus every pair mentioned by `answers`.
  ///
  /// Duplicate answers and answers about pairs outside `all_pairs` have no
  /// effect on the counts.
  pub fn compute(all_pairs: &[Pair], answers: &[Answer]) -> Self {
    let answered: HashSet<&Pair> = answers.iter().map(|a| &a.pair).collect();
    let pairs = all_pairs
      .iter()
      .filter(|p| !answered.contains(p))
      .cloned()
      .collect();
    Self { pairs, total: all_pairs.len() }
  }

  pub fn pairs(&self) -> &[Pair] { &self.pairs }

  pub fn len(&self) -> usize { self.pairs.len() }

  pub fn is_empty(&self) -> bool { self.pairs.is_empty() }

  pub fn contains(&self, pair: &Pair) -> bool { self.pairs.contains(pair) }

  pub fn total_count(&self) -> usize { self.total }

  pub fn answered_count(&self) -> usize { self.total - self.pairs.len() }

  pub fn progress(&self) -> Progress {
    Progress { answered: self.answered_count(), total: self.total }
  }

  pub fn progress_ratio(&self) -> f64 { self.progress().ratio() }

  /// Remaining pairs that involve `item`, in generation order.
  pub fn for_item<'a>(&'a self, item: &'a Item) -> impl Iterator<Item = &'a Pair> + 'a {
    self.pairs.iter().filter(move |p| p.contains(item))
  }

  pub fn count_for(&self, item: &Item) -> usize { self.for_item(item).count() }

  /// Apply a write locally. Returns `false` if the pair was not remaining.
  pub fn mark_answered(&mut self, pair: &Pair) -> bool {
    let before = self.pairs.len();
    self.pairs.retain(|p| p != pair);
    self.pairs.len() != before
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{catalog::Catalog, pair::all_pairs};

  fn item(s: &str) -> Item { Item::parse(s).unwrap() }

  fn answer(a: &str, b: &str, score: &str) -> Answer {
    Answer {
      pair:       Pair::new(item(a), item(b)).unwrap(),
      score:      score.into(),
      written_at: None,
    }
  }

  fn space(names: &[&str]) -> Vec<Pair> { all_pairs(&Catalog::load(names).active()) }

  #[test]
  fn nothing_answered_leaves_full_space() {
    let set = RemainingSet::compute(&space(&["A", "B", "C"]), &[]);
    assert_eq!(set.len(), 3);
    assert_eq!(set.progress(), Progress { answered: 0, total: 3 });
    assert_eq!(set.progress_ratio(), 0.0);
  }

  #[test]
  fn reversed_answers_still_match() {
    let set = RemainingSet::compute(&space(&["A", "B", "C"]), &[answer("C", "A", "2")]);
    assert_eq!(set.len(), 2);
    assert!(!set.contains(&Pair::new(item("A"), item("C")).unwrap()));
  }

  #[test]
  fn duplicates_and_strangers_do_not_inflate_progress() {
    let answers = [
      answer("A", "B", "3"),
      answer("B", "A", "4"),
      answer("A", "Zucchini", "1"),
    ];
    let set = RemainingSet::compute(&space(&["A", "B", "C"]), &answers);
    assert_eq!(set.answered_count(), 1);
    assert_eq!(set.total_count(), 3);
  }

  #[test]
  fn recompute_is_idempotent() {
    let pairs = space(&["A", "B", "C", "D"]);
    let answers = [answer("A", "D", "5"), answer("B", "C", "1")];
    let first = RemainingSet::compute(&pairs, &answers);
    let second = RemainingSet::compute(&pairs, &answers);
    assert_eq!(first.pairs(), second.pairs());
  }

  #[test]
  fn empty_space_has_zero_ratio() {
    let set = RemainingSet::compute(&space(&["A"]), &[]);
    assert_eq!(set.total_count(), 0);
    assert_eq!(set.progress_ratio(), 0.0);
  }

  #[test]
  fn for_item_filters_on_either_side() {
    let set = RemainingSet::compute(&space(&["A", "B", "C"]), &[]);
    assert_eq!(set.count_for(&item("B")), 2);
    assert_eq!(set.count_for(&item("Q")), 0);
  }

  #[test]
  fn mark_answered_removes_once() {
    let mut set = RemainingSet::compute(&space(&["A", "B"]), &[]);
    let pair = Pair::new(item("B"), item("A")).unwrap();
    assert!(set.mark_answered(&pair));
    assert!(!set.mark_answered(&pair));
    assert_eq!(set.progress(), Progress { answered: 1, total: 1 });
  }
}
