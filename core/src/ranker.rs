//! Ordering of merged results within a category.
//!
//! Keys, in order:
//! 1. match count, descending
//! 2. score, descending, but only when the scores differ by more than the
//!    tolerance band
//! 3. frequency, descending
//! 4. final text, ascending (keeps exact ties reproducible)

use std::cmp::Ordering;

use crate::aggregate::MergedResult;

/// Score difference at or below which two results count as equally good.
pub const DEFAULT_SCORE_TOLERANCE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranker {
    pub score_tolerance: i32,
}

impl Default for Ranker {
    fn default() -> Self {
        Self {
            score_tolerance: DEFAULT_SCORE_TOLERANCE,
        }
    }
}

impl Ranker {
    pub fn new(score_tolerance: i32) -> Self {
        Self {
            score_tolerance: score_tolerance.max(0),
        }
    }

    pub fn compare(&self, a: &MergedResult, b: &MergedResult) -> Ordering {
        b.match_count
            .cmp(&a.match_count)
            .then_with(|| {
                if (a.score - b.score).abs() > self.score_tolerance {
                    b.score.cmp(&a.score)
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.final_text.cmp(&b.final_text))
    }

    /// Sort `results` best first.
    ///
    /// `compare` is not transitive across the tolerance band, so this must not
    /// go through `slice::sort_by`. Output depends only on input order.
    pub fn rank(&self, results: Vec<MergedResult>) -> Vec<MergedResult> {
        merge_sort_by(results, &|a, b| self.compare(a, b))
    }
}

fn merge_sort_by<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) != Ordering::Less,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}
