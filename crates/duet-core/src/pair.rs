//! Pairs and the pair space.
//!
//! A [`Pair`] is unordered: `(A, B)` and `(B, A)` compare and hash equal.
//! The stored orientation is only meaningful for pairs produced by
//! [`all_pairs`], where it follows catalog order.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::catalog::Item;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
  pub first:  Item,
  pub second: Item,
}

impl Pair {
  /// Returns `None` for a self-pair.
  pub fn new(first: Item, second: Item) -> Option<Self> {
    (first != second).then_some(Self { first, second })
  }

  pub fn contains(&self, item: &Item) -> bool {
    &self.first == item || &self.second == item
  }

  /// The element that is not `item`, if `item` is part of the pair.
  pub fn other(&self, item: &Item) -> Option<&Item> {
    if &self.first == item {
      Some(&self.second)
    } else if &self.second == item {
      Some(&self.first)
    } else {
      None
    }
  }

  fn sorted(&self) -> (&Item, &Item) {
    if self.first <= self.second {
      (&self.first, &self.second)
    } else {
      (&self.second, &self.first)
    }
  }
}

impl PartialEq for Pair {
  fn eq(&self, other: &Self) -> bool { self.sorted() == other.sorted() }
}

impl Eq for Pair {}

impl Hash for Pair {
  fn hash<H: Hasher>(&self, state: &mut H) { self.sorted().hash(state) }
}

/// Every 2-combination of `active`, in generation order: by position of the
/// first element, then of the second. Duplicate entries in `active` are
/// expected to have been removed by the catalog.
pub fn all_pairs(active: &[Item]) -> Vec<Pair> {
  let n = active.len();
  let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
  for (i, first) in active.iter().enumerate() {
    for second in &active[i + 1..] {
      if let Some(pair) = Pair::new(first.clone(), second.clone()) {
        pairs.push(pair);
      }
    }
  }
  pairs
}
