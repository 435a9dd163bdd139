//! Merging of incrementally fetched batches into a deduplicated collection.

use std::collections::HashMap;

use super::model::{AudioFeatures, Track};

/// Anything that carries a unique string identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Track {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AudioFeatures {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Insertion-ordered map from id to entry.
///
/// Re-inserting an existing id replaces the stored entry but keeps the slot
/// it was first inserted at.
#[derive(Debug, Clone)]
pub struct OrderedById<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Keyed> OrderedById<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn insert(&mut self, item: T) {
        match self.index.get(item.key()) {
            Some(&slot) => self.entries[slot] = item,
            None => {
                let slot = self.entries.len();
                self.index.insert(item.key().to_string(), slot);
                self.entries.push(item);
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.insert(item);
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<T: Keyed> Default for OrderedById<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge `incoming` into `existing`.
///
/// The result holds one entry per id in order of first occurrence across
/// `existing ++ incoming`; for an id seen more than once the latest entry is
/// the one kept.
pub fn accumulate<T: Keyed>(existing: Vec<T>, incoming: Vec<T>) -> Vec<T> {
    if incoming.is_empty() {
        return existing;
    }

    let mut merged = OrderedById::new();
    merged.extend(existing);
    merged.extend(incoming);
    merged.into_vec()
}
