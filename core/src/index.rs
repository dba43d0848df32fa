//! Inverted phonetic index and candidate retrieval.
//!
//! Every record is registered under each distinct key appearing anywhere in
//! its phonetic sequence. Record ids are positions in load order, so posting
//! lists are sorted and candidate pools come out in a reproducible order.

use ahash::AHashMap;
use tracing::debug;

use crate::dict::{DictItem, RawEntry};
use crate::key::{KeyResolver, KeySet, PhoneticKey, ResolvedWord};

/// Position of a record inside its index.
pub type ItemId = usize;

/// Minimum number of aligned characters a candidate must reach.
///
/// Short inputs degrade the floor to their own length so that a
/// one-character word can still match.
pub fn min_limit(input_len: usize, configured_min: usize) -> usize {
    input_len.min(configured_min)
}

#[derive(Debug, Clone, Default)]
pub struct PhoneticIndex {
    items: Vec<DictItem>,
    postings: AHashMap<PhoneticKey, Vec<ItemId>>,
    rejected: usize,
}

impl PhoneticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve and index every entry. Entries that fail validation (no
    /// resolvable key, malformed sequence) are dropped and counted.
    pub fn build<R, I>(entries: I, resolver: &R) -> Self
    where
        R: KeyResolver + ?Sized,
        I: IntoIterator<Item = RawEntry>,
    {
        let mut index = Self::new();
        for entry in entries {
            match DictItem::resolve(entry, resolver) {
                Ok(item) => index.insert(item),
                Err(e) => {
                    debug!("skipping dictionary record: {}", e);
                    index.rejected += 1;
                }
            }
        }
        index
    }

    /// Index already validated records.
    pub fn from_items<I: IntoIterator<Item = DictItem>>(items: I) -> Self {
        let mut index = Self::new();
        for item in items {
            index.insert(item);
        }
        index
    }

    fn insert(&mut self, item: DictItem) {
        let id = self.items.len();
        let distinct: KeySet = item
            .phonetic()
            .iter()
            .flat_map(|set| set.iter().cloned())
            .collect();
        for key in distinct.iter() {
            self.postings.entry(key.clone()).or_default().push(id);
        }
        self.items.push(item);
    }

    /// Records registered under any key of `keys`, ascending by id.
    pub fn candidates_for(&self, keys: &KeySet) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = keys
            .iter()
            .filter_map(|k| self.postings.get(k))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Candidate pool for a query word.
    ///
    /// Unions the lookups of every input position, keeps records whose
    /// category passes `is_active`, and prunes records with fewer than
    /// `min_limit` characters since those can never reach the floor.
    pub fn retrieve<F>(&self, word: &ResolvedWord, min_limit: usize, is_active: F) -> Vec<ItemId>
    where
        F: Fn(&str) -> bool,
    {
        let mut ids: Vec<ItemId> = word
            .keys()
            .iter()
            .flat_map(|set| set.iter())
            .filter_map(|k| self.postings.get(k))
            .flatten()
            .copied()
            .filter(|&id| {
                let item = &self.items[id];
                item.len() >= min_limit && is_active(item.category())
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn item(&self, id: ItemId) -> &DictItem {
        &self.items[id]
    }

    pub fn items(&self) -> &[DictItem] {
        &self.items
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct phonetic keys.
    pub fn key_count(&self) -> usize {
        self.postings.len()
    }

    /// Records dropped during `build`.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
