// src/engine/ranker.rs — Sorting, merging and the popularity fallback

use std::collections::HashSet;

use super::similarity::score_order;

/// Sort scored candidates best first. Stable: equal scores keep input order;
/// non-finite scores go last.
pub fn rank_by_score<I>(scored: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut out: Vec<(String, f64)> = scored.into_iter().collect();
    out.sort_by(|a, b| score_order(a.1, b.1));
    out
}

/// Concatenate lists in priority order, dropping repeats, capped at `cap`.
pub fn merge_unique(lists: &[&[String]], cap: usize) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();
    for pid in lists.iter().flat_map(|l| l.iter()) {
        if merged.len() >= cap {
            break;
        }
        if seen.insert(pid.as_str()) {
            merged.push(pid.clone());
        }
    }
    merged
}

/// Use `primary` unless it is empty, in which case take the first
/// `fallback_size` of the popularity ranking.
pub fn with_popularity_fallback(
    primary: Vec<String>,
    popularity: &[(String, usize)],
    fallback_size: usize,
) -> Vec<String> {
    if !primary.is_empty() {
        return primary;
    }
    tracing::info!("No personalized signal; falling back to most purchased products");
    popularity
        .iter()
        .take(fallback_size)
        .map(|(pid, _)| pid.clone())
        .collect()
}
