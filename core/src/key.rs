//! Phonetic keys and the per-character resolver abstraction.
//!
//! A `PhoneticKey` is one tone-free syllable. A character maps to a
//! `KeySet` because polyphones carry several readings; two positions align
//! when their sets intersect.

use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a raw syllable spelling into its tone-free base form.
///
/// Lowercases, folds `ü` / `u:` to `v`, and drops tone marks in both the
/// diacritic (`zhōng`) and numeric (`zhong1`) styles.
pub fn normalize_syllable(raw: &str) -> String {
    // Fold on the decomposed form so that `ǜ` (u + diaeresis + grave) is
    // caught as well as a bare `ü`.
    let folded = raw
        .nfd()
        .collect::<String>()
        .to_lowercase()
        .replace("u\u{308}", "v")
        .replace("u:", "v");

    folded
        .chars()
        .filter(|c| !is_combining_mark(*c) && !c.is_ascii_digit() && !c.is_whitespace())
        .collect()
}

/// A normalized syllable. Cloning is a reference-count bump.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhoneticKey(Arc<str>);

impl PhoneticKey {
    /// Normalize `raw` into a key. Returns `None` when nothing survives
    /// normalization (e.g. a bare tone digit).
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize_syllable(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(Arc::from(normalized)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The readings of one character position, sorted and de-duplicated.
///
/// Sets are tiny (one to four readings), so a sorted vector with a merge
/// walk beats hashing here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeySet {
    keys: Vec<PhoneticKey>,
}

impl KeySet {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Build a set from raw spellings; spellings that normalize to nothing
    /// are ignored.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|s| PhoneticKey::new(s.as_ref()))
            .collect()
    }

    pub fn insert(&mut self, key: PhoneticKey) {
        if let Err(pos) = self.keys.binary_search(&key) {
            self.keys.insert(pos, key);
        }
    }

    pub fn contains(&self, key: &PhoneticKey) -> bool {
        self.keys.binary_search(key).is_ok()
    }

    /// True when the two sets share at least one reading.
    pub fn intersects(&self, other: &KeySet) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.keys.len() && j < other.keys.len() {
            match self.keys[i].cmp(&other.keys[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhoneticKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<PhoneticKey> for KeySet {
    fn from_iter<T: IntoIterator<Item = PhoneticKey>>(iter: T) -> Self {
        let mut keys: Vec<PhoneticKey> = iter.into_iter().collect();
        keys.sort();
        keys.dedup();
        Self { keys }
    }
}

impl<'a> IntoIterator for &'a KeySet {
    type Item = &'a PhoneticKey;
    type IntoIter = std::slice::Iter<'a, PhoneticKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// The resolvable part of a query word.
///
/// Characters without a pronunciation are skipped, and `chars[i]` is always
/// the character whose readings are `keys[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedWord {
    chars: Vec<char>,
    keys: Vec<KeySet>,
}

impl ResolvedWord {
    pub fn push(&mut self, ch: char, keys: KeySet) {
        debug_assert!(!keys.is_empty());
        self.chars.push(ch);
        self.keys.push(keys);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn keys(&self) -> &[KeySet] {
        &self.keys
    }
}

/// Maps a character to its possible phonetic keys.
///
/// Implementations must be deterministic: the same character always yields
/// the same set. An empty set means "no known pronunciation".
pub trait KeyResolver: Send + Sync {
    fn keys_for(&self, ch: char) -> KeySet;

    /// Resolve a query word, dropping characters without a pronunciation.
    fn resolve(&self, word: &str) -> ResolvedWord {
        let mut resolved = ResolvedWord::default();
        for ch in word.chars() {
            let keys = self.keys_for(ch);
            if !keys.is_empty() {
                resolved.push(ch, keys);
            }
        }
        resolved
    }

    /// One set per character of `text`, empty where a character has no
    /// pronunciation. Used for dictionary records, which keep every position.
    fn sequence_for(&self, text: &str) -> Vec<KeySet> {
        text.chars().map(|ch| self.keys_for(ch)).collect()
    }
}

impl<R: KeyResolver + ?Sized> KeyResolver for Arc<R> {
    fn keys_for(&self, ch: char) -> KeySet {
        (**self).keys_for(ch)
    }
}

/// Explicit character → syllable table.
///
/// Useful for small alphabets and for tests that must not depend on a full
/// pronunciation database.
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    table: AHashMap<char, KeySet>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(char, "syllable syllable ...")` pairs.
    pub fn from_table(rows: &[(char, &str)]) -> Self {
        let mut resolver = Self::new();
        for (ch, readings) in rows {
            resolver.insert(*ch, readings.split_whitespace());
        }
        resolver
    }

    /// Add readings for `ch`, merging with any already present.
    pub fn insert<I, S>(&mut self, ch: char, readings: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.table.entry(ch).or_default();
        for key in KeySet::from_raw(readings).iter() {
            entry.insert(key.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl KeyResolver for TableResolver {
    fn keys_for(&self, ch: char) -> KeySet {
        self.table.get(&ch).cloned().unwrap_or_default()
    }
}
