/// A single node of a surveyed directory tree.
///
/// Unlike an arena, a survey tree is built bottom-up in one call and then
/// handed to the caller, so every node simply owns its children. There are
/// no parent links and no shared references.
use compact_str::CompactString;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Files strictly larger than this are counted in `large_file_count`.
pub const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// A file or directory in a survey result.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// Final path component (or the whole path for filesystem roots).
    pub name: CompactString,

    /// Absolute path; unique within one survey.
    pub path: PathBuf,

    /// `true` if this node represents a directory.
    pub is_dir: bool,

    /// Bytes attributable to this node and its retained descendants.
    pub size: u64,

    /// Number of files in the subtree. Directories are not items.
    pub item_count: u64,

    /// Number of files in the subtree above [`LARGE_FILE_THRESHOLD`].
    pub large_file_count: u64,

    /// Last-modified timestamp, when the stat provided one.
    pub modified: Option<SystemTime>,

    /// `true` when `size` / `item_count` came from a flat fallback scan
    /// (depth limit reached or listing failed) rather than from `children`.
    pub truncated: bool,

    /// Retained children, descending by `size`. Always empty for files.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a terminal file node.
    pub fn file(path: PathBuf, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            name: display_name(&path),
            path,
            is_dir: false,
            size,
            item_count: 1,
            large_file_count: u64::from(size > LARGE_FILE_THRESHOLD),
            modified,
            truncated: false,
            children: Vec::new(),
        }
    }

    /// Create an empty directory node; totals are filled in by the surveyor.
    pub fn dir(path: PathBuf, modified: Option<SystemTime>) -> Self {
        Self {
            name: display_name(&path),
            path,
            is_dir: true,
            size: 0,
            item_count: 0,
            large_file_count: 0,
            modified,
            truncated: false,
            children: Vec::new(),
        }
    }

    /// Attach `child` and fold its totals into this node.
    pub fn attach(&mut self, child: Node) {
        self.size += child.size;
        self.item_count += child.item_count;
        self.large_file_count += child.large_file_count;
        self.children.push(child);
    }

    /// Order children by size, largest first. Ties have no defined order.
    pub fn sort_children(&mut self) {
        self.children.sort_unstable_by(|a, b| b.size.cmp(&a.size));
    }

    /// Returns `true` if this is a file above the large-file threshold.
    #[inline]
    pub fn is_large_file(&self) -> bool {
        !self.is_dir && self.size > LARGE_FILE_THRESHOLD
    }

    /// Pre-order iterator over this node and all of its descendants.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }
}

/// Depth-first, parent-before-children traversal of a [`Node`] tree.
///
/// Children are visited in their stored (size-descending) order.
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Derive a display name: the last component, or the full path for roots
/// like `/` or `C:\` that have none.
fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_file_flag() {
        let small = Node::file(PathBuf::from("/r/a"), LARGE_FILE_THRESHOLD, None);
        let big = Node::file(PathBuf::from("/r/b"), LARGE_FILE_THRESHOLD + 1, None);
        assert_eq!(small.large_file_count, 0);
        assert!(!small.is_large_file());
        assert_eq!(big.large_file_count, 1);
        assert!(big.is_large_file());
    }

    #[test]
    fn test_attach_folds_totals() {
        let mut root = Node::dir(PathBuf::from("/r"), None);
        root.attach(Node::file(PathBuf::from("/r/a"), 10, None));
        root.attach(Node::file(PathBuf::from("/r/b"), LARGE_FILE_THRESHOLD + 5, None));
        assert_eq!(root.size, LARGE_FILE_THRESHOLD + 15);
        assert_eq!(root.item_count, 2);
        assert_eq!(root.large_file_count, 1);
    }

    #[test]
    fn test_preorder_visits_parent_first() {
        let mut sub = Node::dir(PathBuf::from("/r/sub"), None);
        sub.attach(Node::file(PathBuf::from("/r/sub/x"), 5, None));
        let mut root = Node::dir(PathBuf::from("/r"), None);
        root.attach(Node::file(PathBuf::from("/r/a"), 1, None));
        root.attach(sub);
        root.sort_children();

        let names: Vec<&str> = root.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["r", "sub", "x", "a"]);
    }

    #[test]
    fn test_root_name_falls_back_to_path() {
        let root = Node::dir(PathBuf::from("/"), None);
        assert_eq!(root.name.as_str(), "/");
    }
}
