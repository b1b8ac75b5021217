//! Item catalog: the ordered, deduplicated universe of rateable items.
//!
//! Retiring an item removes it from the *active* subset only. Its name stays
//! in the catalog so historical answers that mention it can still be
//! recognised (and excluded) when the log is read.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

// ─── Item ────────────────────────────────────────────────────────────────────

/// A rateable entity, identified by its normalized display string.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Item(String);

impl Item {
  /// Normalize `raw` into an item. Returns `None` for blank input.
  pub fn parse(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Item {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Catalog {
  /// Every item ever loaded, first occurrence wins.
  items:   Vec<Item>,
  retired: HashSet<Item>,
}

impl Catalog {
  /// Build a catalog from a raw list, dropping blanks and later duplicates.
  pub fn load<I, S>(raw: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut catalog = Self::default();
    catalog.extend(raw);
    catalog
  }

  /// Append new items. Names already in the catalog (retired or not) are
  /// ignored. Returns the items that were actually added.
  pub fn extend<I, S>(&mut self, raw: I) -> Vec<Item>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut seen: HashSet<Item> = self.items.iter().cloned().collect();
    let mut added = Vec::new();
    for item in raw.into_iter().filter_map(|s| Item::parse(s.as_ref())) {
      if seen.insert(item.clone()) {
        self.items.push(item.clone());
        added.push(item);
      }
    }
    added
  }

  /// Exclude the named items from the active subset.
  ///
  /// Names not in the catalog are ignored. Returns the items whose status
  /// changed.
  pub fn retire<I, S>(&mut self, names: I) -> Vec<Item>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut changed = Vec::new();
    for name in names {
      let Some(item) = self.lookup(name.as_ref()) else {
        tracing::warn!(item = name.as_ref(), "cannot retire unknown item");
        continue;
      };
      if self.retired.insert(item.clone()) {
        changed.push(item);
      }
    }
    changed
  }

  /// Return previously retired items to the active subset.
  pub fn reinstate<I, S>(&mut self, names: I) -> Vec<Item>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut changed = Vec::new();
    for name in names {
      let Some(item) = self.lookup(name.as_ref()) else {
        tracing::warn!(item = name.as_ref(), "cannot reinstate unknown item");
        continue;
      };
      if self.retired.remove(&item) {
        changed.push(item);
      }
    }
    changed
  }

  fn lookup(&self, name: &str) -> Option<Item> {
    let item = Item::parse(name)?;
    self.items.contains(&item).then_some(item)
  }

  /// Active items in catalog order.
  pub fn active(&self) -> Vec<Item> {
    self
      .items
      .iter()
      .filter(|i| !self.retired.contains(*i))
      .cloned()
      .collect()
  }

  pub fn active_len(&self) -> usize { self.items.len() - self.retired.len() }

  pub fn is_active(&self, item: &Item) -> bool {
    !self.retired.contains(item) && self.items.contains(item)
  }

  pub fn is_retired(&self, item: &Item) -> bool { self.retired.contains(item) }

  /// Catalog position of `item`, retired or not.
  pub fn position(&self, item: &Item) -> Option<usize> {
    self.items.iter().position(|i| i == item)
  }

  /// All items, including retired ones.
  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }
}
