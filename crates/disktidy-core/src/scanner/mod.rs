/// Scanner module: filesystem measurement.
///
/// Provides two strategies that share the same error-absorbing rules:
/// - **Flat scan ([`size`]):** `jwalk` walk of a whole subtree returning byte
///   and file totals only. Used for cleanup targets and depth-truncated
///   survey directories.
/// - **Survey ([`survey`]):** depth-bounded, filtered tree of [`Node`]s with
///   per-directory aggregation, fanned out across a bounded rayon pool.
///
/// [`Node`]: crate::model::Node
pub mod size;
pub mod survey;

pub use size::{scan_size, scan_size_with, SizeTotals};
pub use survey::{survey, survey_with_cancel, SurveyConfig};

use std::fs;
use std::io;
use std::path::Path;

/// A symlink whose target does not exist. Such entries are skipped like
/// any other entry that cannot be stat'd.
pub(crate) fn is_dangling_link(path: &Path) -> bool {
    matches!(fs::metadata(path), Err(err) if err.kind() == io::ErrorKind::NotFound)
}

/// Hidden-name convention: a leading dot.
#[inline]
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}
