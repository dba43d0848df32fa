//! Dictionary records.
//!
//! Loaders hand the core `RawEntry` values; the core attaches the phonetic
//! sequence and validates the result as a `DictItem` before indexing.

use crate::error::{PunError, Result};
use crate::key::{KeyResolver, KeySet};
use serde::{Deserialize, Serialize};

/// One normalized record as produced by a dictionary loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// The text matched against (for riddle sayings, only the answer half).
    pub text: String,
    /// Category (dictionary type) name.
    pub category: String,
    /// Display-only annotation, e.g. the riddle half of a two-part saying.
    #[serde(default)]
    pub annotation: String,
    /// Usage weight; only used as the last ranking key.
    #[serde(default)]
    pub frequency: u64,
}

impl RawEntry {
    pub fn new<T: Into<String>, C: Into<String>>(text: T, category: C, frequency: u64) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            annotation: String::new(),
            frequency,
        }
    }

    pub fn with_annotation<A: Into<String>>(mut self, annotation: A) -> Self {
        self.annotation = annotation.into();
        self
    }
}

/// An indexed dictionary record. Immutable once built.
///
/// `phonetic[i]` holds the readings of the i-th character of `text`; a
/// position may be empty (punctuation), but at least one is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictItem {
    text: String,
    chars: Vec<char>,
    category: String,
    annotation: String,
    frequency: u64,
    phonetic: Vec<KeySet>,
}

impl DictItem {
    /// Build a record from an explicit phonetic sequence, rejecting a
    /// sequence that does not line up with the characters of `text`.
    pub fn new(entry: RawEntry, phonetic: Vec<KeySet>) -> Result<Self> {
        let chars: Vec<char> = entry.text.chars().collect();
        if chars.len() != phonetic.len() {
            return Err(PunError::MalformedItem {
                text: entry.text,
                chars: chars.len(),
                positions: phonetic.len(),
            });
        }
        if phonetic.iter().all(KeySet::is_empty) {
            return Err(PunError::Unresolvable(entry.text));
        }

        Ok(Self {
            text: entry.text,
            chars,
            category: entry.category,
            annotation: entry.annotation,
            frequency: entry.frequency,
            phonetic,
        })
    }

    /// Resolve the phonetic sequence of `entry.text` and build the record.
    pub fn resolve<R: KeyResolver + ?Sized>(entry: RawEntry, resolver: &R) -> Result<Self> {
        let phonetic = resolver.sequence_for(&entry.text);
        Self::new(entry, phonetic)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Character count of `text`.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn phonetic(&self) -> &[KeySet] {
        &self.phonetic
    }
}
