//! Merging of alignments that yield the same text within one category.

use indexmap::{IndexMap, IndexSet};

use crate::dict::DictItem;
use crate::matcher::MatchResult;
use crate::results::PunResult;

/// One alignment ready to be merged: display text and origin already carry
/// any annotation prefix, and `indices` point into the display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub display: String,
    pub origin: String,
    pub indices: Vec<usize>,
    pub match_count: usize,
    pub score: i32,
    pub frequency: u64,
}

impl Contribution {
    /// Wrap an alignment of `item`.
    ///
    /// With `prefix_separator` set and a non-blank annotation on the record,
    /// both texts become `annotation + separator + text` and every index is
    /// shifted by the prefix's character count.
    pub fn from_match(item: &DictItem, m: MatchResult, prefix_separator: Option<&str>) -> Self {
        let annotation = item.annotation();
        let mut contribution = Self {
            display: m.final_text,
            origin: item.text().to_string(),
            indices: m.indices,
            match_count: m.match_count,
            score: m.score,
            frequency: item.frequency(),
        };

        if let Some(separator) = prefix_separator {
            if !annotation.trim().is_empty() {
                let prefix = format!("{}{}", annotation, separator);
                let offset = prefix.chars().count();
                contribution.display = format!("{}{}", prefix, contribution.display);
                contribution.origin = format!("{}{}", prefix, contribution.origin);
                for idx in contribution.indices.iter_mut() {
                    *idx += offset;
                }
            }
        }
        contribution
    }
}

/// All contributions sharing one display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedResult {
    pub final_text: String,
    /// Taken from the contributor with the highest match count.
    pub indices: Vec<usize>,
    pub match_count: usize,
    pub score: i32,
    pub frequency: u64,
    /// Distinct origin texts in first-seen order.
    pub origins: IndexSet<String>,
}

impl MergedResult {
    fn new(c: Contribution) -> Self {
        Self {
            final_text: c.display,
            indices: c.indices,
            match_count: c.match_count,
            score: c.score,
            frequency: c.frequency,
            origins: IndexSet::from([c.origin]),
        }
    }

    /// Fold another contributor in.
    ///
    /// A higher match count replaces score, frequency and indices; an equal
    /// one raises score and frequency to the larger values; a lower one only
    /// adds its origin.
    fn absorb(&mut self, c: Contribution) {
        self.origins.insert(c.origin);
        if c.match_count > self.match_count {
            self.match_count = c.match_count;
            self.score = c.score;
            self.frequency = c.frequency;
            self.indices = c.indices;
        } else if c.match_count == self.match_count {
            self.score = self.score.max(c.score);
            self.frequency = self.frequency.max(c.frequency);
        }
    }

    pub fn into_pun_result(self) -> PunResult {
        PunResult {
            pun: self.final_text,
            origins: self.origins,
            highlights: self.indices,
        }
    }
}

/// Per-category merge table keyed by display text, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct MergeGroup {
    entries: IndexMap<String, MergedResult>,
}

impl MergeGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, c: Contribution) {
        match self.entries.get_mut(&c.display) {
            Some(merged) => merged.absorb(c),
            None => {
                self.entries.insert(c.display.clone(), MergedResult::new(c));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_results(self) -> Vec<MergedResult> {
        self.entries.into_values().collect()
    }
}
