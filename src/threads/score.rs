use tracing::debug;

use super::{ScoredPair, Weight};
use crate::content::ContentItem;

pub const TAG_WEIGHT: f64 = 10.0;
pub const RECENCY_PENALTY_PER_DAY: f64 = 0.01;
/// At the cap the penalty is 3.65, which never outweighs a single shared tag.
pub const RECENCY_CAP_DAYS: i64 = 365;
pub const MISSING_DATE_DAYS: i64 = 36_500;

/// Scores one unordered pair. Returns `None` for self pairs, pairs with no
/// written endpoint, and pairs that share no tags.
pub fn score_pair<'a>(first: &'a ContentItem, second: &'a ContentItem) -> Option<ScoredPair<'a>> {
    if first.id == second.id {
        return None;
    }

    if !first.kind.is_written() && !second.kind.is_written() {
        return None;
    }

    let (a, b) = if first.id < second.id {
        (first, second)
    } else {
        (second, first)
    };

    let shared_tag_count = a.shared_tag_count(b);
    let weight = Weight::from_shared_tags(shared_tag_count)?;
    let days_apart = a.days_apart(b).unwrap_or(MISSING_DATE_DAYS);
    let score = (shared_tag_count as f64 * TAG_WEIGHT)
        - (days_apart.min(RECENCY_CAP_DAYS) as f64 * RECENCY_PENALTY_PER_DAY);

    Some(ScoredPair {
        a,
        b,
        shared_tag_count,
        days_apart,
        score,
        weight,
    })
}

/// Every candidate pair in the corpus, in enumeration order.
pub fn score_pairs(items: &[ContentItem]) -> Vec<ScoredPair<'_>> {
    let mut candidates = Vec::new();
    for (index, first) in items.iter().enumerate() {
        for second in &items[index + 1..] {
            if let Some(pair) = score_pair(first, second) {
                candidates.push(pair);
            }
        }
    }

    debug!(
        items = items.len(),
        candidates = candidates.len(),
        "scored content pairs"
    );
    candidates
}
