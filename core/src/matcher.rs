//! Character alignment between a query word and one dictionary record.
//!
//! Two strategies share the same output:
//! - `Ordered`: best monotonic subsequence alignment over every starting
//!   input position, with a bonus for contiguous record positions.
//! - `Unordered`: greedy claiming of the first unused record position whose
//!   readings intersect, input characters taken left to right.

use serde::{Deserialize, Serialize};

use crate::dict::DictItem;
use crate::key::ResolvedWord;

/// Which alignment runs for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Aligned record positions must advance with the input.
    Ordered,
    /// Any unused record position may be claimed.
    Unordered,
}

impl MatchStrategy {
    /// The strategy selected by the `ignore_order` query flag.
    pub fn from_ignore_order(ignore_order: bool) -> Self {
        if ignore_order {
            MatchStrategy::Unordered
        } else {
            MatchStrategy::Ordered
        }
    }
}

/// Point values used while aligning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoring {
    /// Awarded per aligned character.
    pub match_points: i32,
    /// Extra points when an ordered match lands right after the previous one.
    pub adjacency_bonus: i32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            match_points: 10,
            adjacency_bonus: 20,
        }
    }
}

/// Outcome of aligning one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Record text with each aligned position replaced by its input character.
    pub final_text: String,
    pub match_count: usize,
    pub score: i32,
    /// Substituted positions in the record text, ascending.
    pub indices: Vec<usize>,
}

/// Align `word` against `item`. Returns `None` when fewer than `min_limit`
/// characters align.
pub fn align(
    strategy: MatchStrategy,
    word: &ResolvedWord,
    item: &DictItem,
    min_limit: usize,
    scoring: Scoring,
) -> Option<MatchResult> {
    match strategy {
        MatchStrategy::Ordered => align_ordered(word, item, min_limit, scoring),
        MatchStrategy::Unordered => align_unordered(word, item, min_limit, scoring),
    }
}

/// Order-preserving alignment.
///
/// For each start `i`, input positions `i..` are scanned; each one takes the
/// first record position at or after the cursor whose readings intersect.
/// The best start has the most matches, then the highest score; the first
/// start wins exact ties.
pub fn align_ordered(
    word: &ResolvedWord,
    item: &DictItem,
    min_limit: usize,
    scoring: Scoring,
) -> Option<MatchResult> {
    let input = word.keys();
    let record = item.phonetic();
    let mut best: Option<(usize, i32, Vec<(usize, char)>)> = None;

    for start in 0..input.len() {
        let mut cursor = 0;
        let mut score = 0;
        let mut pairs: Vec<(usize, char)> = Vec::new();

        for j in start..input.len() {
            let found = (cursor..record.len()).find(|&k| record[k].intersects(&input[j]));
            if let Some(k) = found {
                score += scoring.match_points;
                if matches!(pairs.last(), Some(&(prev, _)) if k == prev + 1) {
                    score += scoring.adjacency_bonus;
                }
                pairs.push((k, word.chars()[j]));
                cursor = k + 1;
            }
        }

        let count = pairs.len();
        if count < min_limit {
            continue;
        }
        let better = match &best {
            None => true,
            Some((best_count, best_score, _)) => {
                count > *best_count || (count == *best_count && score > *best_score)
            }
        };
        if better {
            best = Some((count, score, pairs));
        }
    }

    best.map(|(count, score, pairs)| build_result(item, count, score, pairs))
}

/// Order-free greedy alignment. A record position is claimed at most once.
pub fn align_unordered(
    word: &ResolvedWord,
    item: &DictItem,
    min_limit: usize,
    scoring: Scoring,
) -> Option<MatchResult> {
    let record = item.phonetic();
    let mut claimed = vec![false; record.len()];
    let mut pairs: Vec<(usize, char)> = Vec::new();
    let mut score = 0;

    for (j, keys) in word.keys().iter().enumerate() {
        let free = (0..record.len()).find(|&k| !claimed[k] && record[k].intersects(keys));
        if let Some(k) = free {
            claimed[k] = true;
            pairs.push((k, word.chars()[j]));
            score += scoring.match_points;
        }
    }

    let count = pairs.len();
    if count < min_limit {
        return None;
    }
    Some(build_result(item, count, score, pairs))
}

fn build_result(item: &DictItem, count: usize, score: i32, mut pairs: Vec<(usize, char)>) -> MatchResult {
    pairs.sort_unstable_by_key(|&(pos, _)| pos);
    MatchResult {
        final_text: substitute(item.chars(), &pairs),
        match_count: count,
        score,
        indices: pairs.iter().map(|&(pos, _)| pos).collect(),
    }
}

/// Copy `chars`, overwriting each `(position, replacement)`. Out-of-range
/// positions are ignored.
pub fn substitute(chars: &[char], replacements: &[(usize, char)]) -> String {
    let mut out = chars.to_vec();
    for &(pos, ch) in replacements {
        if let Some(slot) = out.get_mut(pos) {
            *slot = ch;
        }
    }
    out.into_iter().collect()
}
