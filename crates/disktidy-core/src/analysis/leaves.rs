/// File-leaf extraction.
use crate::model::Node;

/// Every file node under `root` in pre-order; directories are excluded.
///
/// A file root yields itself.
pub fn collect_leaves(root: &Node) -> Vec<&Node> {
    root.iter().filter(|node| !node.is_dir).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{dir, file, sample_tree};

    #[test]
    fn test_collects_only_files_in_preorder() {
        let tree = sample_tree();
        let mut names: Vec<&str> = collect_leaves(&tree).iter().map(|n| n.name.as_str()).collect();
        // Children are size-ordered: big.iso(500), pics(340), docs(80).
        assert_eq!(names[..3], ["big.iso", "c.png", "d.png"]);
        // a.txt and b.txt tie on size, so their relative order is unspecified.
        names[3..].sort_unstable();
        assert_eq!(names[3..], ["a.txt", "b.txt"]);
    }

    #[test]
    fn test_empty_directory_has_no_leaves() {
        assert!(collect_leaves(&dir("/empty", Vec::new())).is_empty());
    }

    #[test]
    fn test_file_root_is_its_own_leaf() {
        let f = file("/r/x", 3);
        assert_eq!(collect_leaves(&f).len(), 1);
    }
}
