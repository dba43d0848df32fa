//! Query output types.
//!
//! This module provides:
//! - `PunResult`: one generated pun with its origins and highlight positions
//! - `PunResults`: category → ranked results, in query order
//! - `ResultPage`: a window over one category's list for incremental display

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One generated pun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunResult {
    /// Substituted text, annotation-prefixed where the category has one.
    pub pun: String,
    /// Distinct source texts producing this pun, first-seen order.
    pub origins: IndexSet<String>,
    /// Character positions in `pun` that were substituted.
    pub highlights: Vec<usize>,
}

/// Ranked results per category.
///
/// Every requested category is present, even when its list is empty.
/// Serializes as a JSON object whose keys keep this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PunResults {
    groups: IndexMap<String, Vec<PunResult>>,
}

impl PunResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty list for `category` unless one already exists.
    pub fn ensure(&mut self, category: &str) {
        if !self.groups.contains_key(category) {
            self.groups.insert(category.to_string(), Vec::new());
        }
    }

    /// Replace the list for `category`, adding the category if needed.
    pub fn set(&mut self, category: &str, results: Vec<PunResult>) {
        match self.groups.get_mut(category) {
            Some(list) => *list = results,
            None => {
                self.groups.insert(category.to_string(), results);
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<&[PunResult]> {
        self.groups.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PunResult])> {
        self.groups
            .iter()
            .map(|(name, list)| (name.as_str(), list.as_slice()))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total results across all categories.
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Copy with each category cut down to one page.
    pub fn paged(&self, page: usize, initial_size: usize, step: usize) -> PunResults {
        PunResults {
            groups: self
                .groups
                .iter()
                .map(|(name, list)| {
                    let window = ResultPage::nth(list, page, initial_size, step);
                    (name.clone(), window.items().to_vec())
                })
                .collect(),
        }
    }
}

/// A window over a ranked list.
///
/// The first page holds `initial_size` results and every later page
/// `step` more, matching a "show more" style front end.
#[derive(Debug, Clone, Copy)]
pub struct ResultPage<'a> {
    items: &'a [PunResult],
    offset: usize,
    total: usize,
}

impl<'a> ResultPage<'a> {
    /// Slice `size` results starting at `offset`.
    pub fn new(all: &'a [PunResult], offset: usize, size: usize) -> Self {
        let start = offset.min(all.len());
        let end = start.saturating_add(size).min(all.len());
        Self {
            items: &all[start..end],
            offset: start,
            total: all.len(),
        }
    }

    /// Page `page` (0-based) under the initial-size / step scheme.
    pub fn nth(all: &'a [PunResult], page: usize, initial_size: usize, step: usize) -> Self {
        let initial_size = initial_size.max(1);
        let step = step.max(1);
        if page == 0 {
            Self::new(all, 0, initial_size)
        } else {
            let offset = initial_size.saturating_add((page - 1).saturating_mul(step));
            Self::new(all, offset, step)
        }
    }

    pub fn items(&self) -> &'a [PunResult] {
        self.items
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when results remain after this page.
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }
}
