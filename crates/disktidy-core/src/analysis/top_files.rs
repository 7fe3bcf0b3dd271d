/// Top-N largest files analysis.
use crate::analysis::leaves::collect_leaves;
use crate::model::Node;

/// The `n` largest files under `root`, sorted descending by size.
///
/// Uses `select_nth_unstable_by` to bring the top-N to the front before
/// sorting only those, which avoids a full sort when the tree is large.
pub fn top_n_by_size(root: &Node, n: usize) -> Vec<&Node> {
    if n == 0 {
        return Vec::new();
    }

    let mut files = collect_leaves(root);
    if files.len() > n {
        files.select_nth_unstable_by(n - 1, |a, b| b.size.cmp(&a.size));
        files.truncate(n);
    }
    files.sort_unstable_by(|a, b| b.size.cmp(&a.size));
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_tree;

    #[test]
    fn test_top_two() {
        let tree = sample_tree();
        let top = top_n_by_size(&tree, 2);
        let sizes: Vec<u64> = top.iter().map(|n| n.size).collect();
        assert_eq!(sizes, vec![500, 300]);
    }

    #[test]
    fn test_n_larger_than_file_count() {
        let tree = sample_tree();
        let top = top_n_by_size(&tree, 50);
        assert_eq!(top.len(), 5);
        assert!(top.windows(2).all(|w| w[0].size >= w[1].size));
    }

    #[test]
    fn test_zero_requested() {
        assert!(top_n_by_size(&sample_tree(), 0).is_empty());
    }
}
