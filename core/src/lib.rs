//! pungen-core
//!
//! Language-agnostic engine behind the sound-alike pun generators: given a
//! word, find dictionary phrases whose characters sound like it and splice
//! the word into them.
//!
//! Public API:
//! - `PhoneticKey`, `KeySet`, `KeyResolver` - per-character syllable keys
//! - `DictItem`, `RawEntry` - dictionary records
//! - `PhoneticIndex` - key → records inverted index and candidate retrieval
//! - `MatchStrategy`, `align` - ordered and order-free character alignment
//! - `MergeGroup`, `Ranker` - per-category merging and ranking
//! - `CategoryRegistry` - menu groups, priorities, default selection
//! - `PunEngine` - query entry point over an atomically swapped snapshot
//! - `Config` - tunables, loadable from TOML
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod error;
pub use error::{PunError, Result};

pub mod key;
pub use key::{normalize_syllable, KeyResolver, KeySet, PhoneticKey, ResolvedWord, TableResolver};

pub mod dict;
pub use dict::{DictItem, RawEntry};

pub mod index;
pub use index::{min_limit, ItemId, PhoneticIndex};

pub mod matcher;
pub use matcher::{align, align_ordered, align_unordered, MatchResult, MatchStrategy, Scoring};

pub mod aggregate;
pub use aggregate::{Contribution, MergeGroup, MergedResult};

pub mod ranker;
pub use ranker::{Ranker, DEFAULT_SCORE_TOLERANCE};

pub mod category;
pub use category::{CategoryGroup, CategoryRegistry};

pub mod results;
pub use results::{PunResult, PunResults, ResultPage};

pub mod engine;
pub use engine::{EngineStats, PunEngine, Query, Snapshot};

/// Default separator between a riddle and its answer in displayed text.
pub const DEFAULT_ANNOTATION_SEPARATOR: &str = "——";

/// Matching and ranking tunables.
///
/// Language crates flatten this into their own configuration; every field
/// has a default so partial TOML files work.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Floor on aligned characters; short inputs lower it to their length.
    pub min_match_count: usize,
    /// Points per aligned character.
    pub match_points: i32,
    /// Ordered-mode bonus for a match right after the previous one.
    pub adjacency_bonus: i32,
    /// Score differences up to this value are treated as equal when ranking.
    /// Chosen empirically; tune per corpus.
    pub score_tolerance: i32,
    /// Joiner between a record's annotation and its text.
    pub annotation_separator: String,
    /// Strategy when a query does not say: true selects order-free matching.
    pub ignore_order_default: bool,
    /// Query result cache capacity; 0 disables the cache.
    pub max_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_match_count: 2,
            match_points: 10,
            adjacency_bonus: 20,
            score_tolerance: DEFAULT_SCORE_TOLERANCE,
            annotation_separator: DEFAULT_ANNOTATION_SEPARATOR.to_string(),
            ignore_order_default: true,
            max_cache_size: 256,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn scoring(&self) -> Scoring {
        Scoring {
            match_points: self.match_points,
            adjacency_bonus: self.adjacency_bonus,
        }
    }

    pub fn ranker(&self) -> Ranker {
        Ranker::new(self.score_tolerance)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}
