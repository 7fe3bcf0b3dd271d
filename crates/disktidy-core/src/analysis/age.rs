/// File age analysis: find files that haven't been modified recently.
use crate::analysis::leaves::collect_leaves;
use crate::model::Node;
use std::time::{Duration, SystemTime};

/// A file identified as old/stale.
pub struct StaleFile<'a> {
    pub node: &'a Node,
    pub age_days: u64,
}

/// Files not modified in the last `min_age_days` days, largest first.
///
/// Files without a recorded modification time are never stale. Returns an
/// empty vec when `max_results == 0`.
pub fn find_stale_files(root: &Node, min_age_days: u64, max_results: usize) -> Vec<StaleFile<'_>> {
    find_stale_files_at(root, min_age_days, max_results, SystemTime::now())
}

fn find_stale_files_at(
    root: &Node,
    min_age_days: u64,
    max_results: usize,
    now: SystemTime,
) -> Vec<StaleFile<'_>> {
    if max_results == 0 {
        return Vec::new();
    }

    let threshold = Duration::from_secs(min_age_days.saturating_mul(86_400));
    let mut stale: Vec<StaleFile<'_>> = collect_leaves(root)
        .into_iter()
        .filter_map(|node| {
            let age = now.duration_since(node.modified?).ok()?;
            (age >= threshold).then(|| StaleFile {
                node,
                age_days: age.as_secs() / 86_400,
            })
        })
        .collect();

    if stale.len() > max_results {
        stale.select_nth_unstable_by(max_results - 1, |a, b| b.node.size.cmp(&a.node.size));
        stale.truncate(max_results);
    }
    stale.sort_unstable_by(|a, b| b.node.size.cmp(&a.node.size));
    stale
}
