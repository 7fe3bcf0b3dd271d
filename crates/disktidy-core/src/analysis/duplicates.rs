/// Candidate-duplicate grouping by exact file size.
///
/// This is a heuristic, not duplicate detection: equal size says nothing
/// about equal content. Callers must present these groups as candidates to
/// verify and never delete on the strength of a size match alone.
use crate::analysis::leaves::collect_leaves;
use crate::model::Node;
use std::collections::HashMap;

/// Files sharing one exact size.
#[derive(Debug)]
pub struct SizeCandidateGroup<'a> {
    /// Size of each file in the group.
    pub size: u64,
    pub files: Vec<&'a Node>,
}

impl SizeCandidateGroup<'_> {
    /// Bytes that would be reclaimed if all but one file were redundant.
    pub fn reclaimable(&self) -> u64 {
        self.size * (self.files.len() as u64).saturating_sub(1)
    }
}

/// Map every file size under `root` to the files of exactly that size.
pub fn group_by_size(root: &Node) -> HashMap<u64, Vec<&Node>> {
    let mut groups: HashMap<u64, Vec<&Node>> = HashMap::new();
    for leaf in collect_leaves(root) {
        groups.entry(leaf.size).or_default().push(leaf);
    }
    groups
}

/// Sizes shared by two or more files, largest reclaimable bytes first.
///
/// Zero-byte files are left out: every empty file would otherwise be a
/// "candidate" of every other.
pub fn duplicate_candidates(root: &Node) -> Vec<SizeCandidateGroup<'_>> {
    let mut groups: Vec<SizeCandidateGroup<'_>> = group_by_size(root)
        .into_iter()
        .filter(|(size, files)| *size > 0 && files.len() > 1)
        .map(|(size, files)| SizeCandidateGroup { size, files })
        .collect();
    groups.sort_unstable_by(|a, b| {
        b.reclaimable()
            .cmp(&a.reclaimable())
            .then(b.size.cmp(&a.size))
    });
    groups
}
