/// Depth-bounded, filtered directory survey.
///
/// The walk is depth-first and bottom-up: a directory's totals are computed
/// only after every child has been surveyed, filtered and collected. Child
/// subtrees are independent, so they are fanned out across a bounded rayon
/// pool. Which entries count never depends on the thread count.
///
/// # Absorbed failures
///
/// Only the root stat can fail the call. Below the root:
/// - a child that cannot be stat'd is skipped entirely;
/// - a directory that cannot be listed falls back to a flat [`scan_size`];
/// - a directory at `max_depth` also falls back to a flat scan.
///
/// The flat fallback counts hidden entries and ignores `min_size` unless
/// [`SurveyConfig::filtered_fallback`] is set.
use crate::error::SurveyError;
use crate::model::Node;
use crate::scanner::{is_dangling_link, is_hidden_name};
use crate::scanner::size::scan_size_with;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Survey-time filter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Directories at or beyond this depth (root = 0) are not expanded.
    pub max_depth: usize,
    /// When `false`, dot-named entries are excluded before recursion.
    pub show_hidden: bool,
    /// Child subtrees smaller than this are dropped, bytes and all.
    pub min_size: u64,
    /// Apply the hidden-name filter inside depth-truncated fallback scans too.
    pub filtered_fallback: bool,
    /// Worker threads for the survey pool. `0` means one per CPU.
    pub threads: usize,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            show_hidden: false,
            min_size: 0,
            filtered_fallback: false,
            threads: 0,
        }
    }
}

impl SurveyConfig {
    /// Number of worker threads the survey pool will use.
    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

/// Survey `root` and return its fully aggregated tree.
///
/// A relative `root` is resolved against the working directory, so every
/// returned [`Node::path`] is absolute.
pub fn survey(root: &Path, config: &SurveyConfig) -> Result<Node, SurveyError> {
    survey_with_cancel(root, config, &AtomicBool::new(false))
}

/// Survey `root`, checking `cancel` before each directory is expanded.
///
/// Returns [`SurveyError::Cancelled`] if the flag was raised at any point
/// during the walk; a partially built tree is never returned.
pub fn survey_with_cancel(
    root: &Path,
    config: &SurveyConfig,
    cancel: &AtomicBool,
) -> Result<Node, SurveyError> {
    let start = Instant::now();
    let not_accessible = |source| SurveyError::NotAccessible {
        path: root.to_path_buf(),
        source,
    };
    // Node paths all derive from the root.
    let root = std::path::absolute(root).map_err(not_accessible)?;
    info!("Starting survey of {}", root.display());

    let meta = fs::metadata(&root).map_err(not_accessible)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads())
        .thread_name(|i| format!("disktidy-survey-{i}"))
        .build()?;

    let surveyor = Surveyor { config, cancel };
    let node = pool.install(|| surveyor.survey_node(root.clone(), &meta, 0));

    if cancel.load(Ordering::Relaxed) {
        info!("Survey of {} cancelled", root.display());
        return Err(SurveyError::Cancelled);
    }

    info!(
        "Survey of {} complete: {} bytes in {} files ({} large) in {:?}",
        root.display(),
        node.size,
        node.item_count,
        node.large_file_count,
        start.elapsed()
    );
    Ok(node)
}

/// Per-call survey state shared by every worker.
struct Surveyor<'a> {
    config: &'a SurveyConfig,
    cancel: &'a AtomicBool,
}

impl Surveyor<'_> {
    fn survey_node(&self, path: PathBuf, meta: &Metadata, depth: usize) -> Node {
        let modified = meta.modified().ok();
        if !meta.is_dir() {
            return Node::file(path, meta.len(), modified);
        }

        let mut node = Node::dir(path, modified);

        if self.cancel.load(Ordering::Relaxed) {
            return node;
        }

        if depth >= self.config.max_depth {
            return self.flat_fallback(node);
        }

        let entries = match fs::read_dir(&node.path) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("Cannot list {:?} ({}), using flat scan", node.path, err);
                return self.flat_fallback(node);
            }
        };

        let child_paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    trace!("Skipping unreadable entry in {:?}: {}", node.path, err);
                    None
                }
            })
            .filter(|e| self.config.show_hidden || !is_hidden_name(&e.file_name().to_string_lossy()))
            .map(|e| e.path())
            .collect();

        let children: Vec<Node> = child_paths
            .into_par_iter()
            .filter_map(|child| self.survey_child(child, depth + 1))
            .collect();

        for child in children {
            if child.size >= self.config.min_size {
                node.attach(child);
            }
        }
        node.sort_children();
        node
    }

    /// Survey one child entry; `None` if it cannot be stat'd.
    fn survey_child(&self, path: PathBuf, depth: usize) -> Option<Node> {
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_symlink() && is_dangling_link(&path) => {
                trace!("Skipping dangling symlink {:?}", path);
                None
            }
            Ok(meta) => Some(self.survey_node(path, &meta, depth)),
            Err(err) => {
                trace!("Skipping inaccessible {:?}: {}", path, err);
                None
            }
        }
    }

    /// Populate a directory's totals from an unfiltered (by default) flat scan.
    fn flat_fallback(&self, mut node: Node) -> Node {
        let skip_hidden = self.config.filtered_fallback && !self.config.show_hidden;
        let totals = scan_size_with(&node.path, skip_hidden);
        node.size = totals.size;
        node.item_count = totals.file_count;
        node.large_file_count = totals.large_file_count;
        node.truncated = true;
        node
    }
}
