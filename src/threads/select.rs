use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{ScoredPair, ThreadConfig, ThreadPair};
use crate::error::Result;

fn rank(left: &ScoredPair<'_>, right: &ScoredPair<'_>) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| right.shared_tag_count.cmp(&left.shared_tag_count))
        .then_with(|| left.a.id.cmp(&right.a.id))
        .then_with(|| left.b.id.cmp(&right.b.id))
}

/// Picks the displayable threads from the scored candidates.
///
/// Candidates are walked from highest score down. A pair is skipped when
/// either endpoint already has `fan_out_cap` threads, and the walk stops at
/// `max_pairs`. The result keeps that descending-score order.
pub fn select_threads(
    candidates: &[ScoredPair<'_>],
    config: &ThreadConfig,
) -> Result<Vec<ThreadPair>> {
    config.validate()?;

    let mut ranked = candidates.iter().collect::<Vec<_>>();
    ranked.sort_by(|left, right| rank(left, right));

    let mut degree: HashMap<&str, usize> = HashMap::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut accepted = Vec::with_capacity(config.max_pairs.min(ranked.len()));
    let mut fan_out_skips = 0usize;

    for pair in ranked {
        if accepted.len() >= config.max_pairs {
            break;
        }

        let from = pair.a.id.as_str();
        let to = pair.b.id.as_str();
        if from == to {
            continue;
        }

        let key = if from < to { (from, to) } else { (to, from) };
        if seen.contains(&key) {
            continue;
        }

        let from_degree = degree.get(from).copied().unwrap_or(0);
        let to_degree = degree.get(to).copied().unwrap_or(0);
        if from_degree >= config.fan_out_cap || to_degree >= config.fan_out_cap {
            fan_out_skips += 1;
            continue;
        }

        seen.insert(key);
        *degree.entry(from).or_default() += 1;
        *degree.entry(to).or_default() += 1;
        accepted.push(ThreadPair::from_scored(pair));
    }

    debug!(
        candidates = candidates.len(),
        accepted = accepted.len(),
        fan_out_skips,
        "selected thread pairs"
    );
    Ok(accepted)
}
