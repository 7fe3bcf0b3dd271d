/// Best-effort directory cleaning.
///
/// Unlike [`delete_with_retry`] on a whole target, this walker deletes files
/// one at a time, so partial success is observable: locked files are counted
/// as skipped while everything else goes. Emptied subdirectories are removed
/// opportunistically; the directory passed in is kept.
use super::delete::{delete_with_retry, RetryPolicy};
use crate::error::CleanError;
use std::fs;
use std::ops::AddAssign;
use std::path::Path;
use tracing::{debug, trace};

/// Totals from one [`clean_directory`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub bytes_freed: u64,
    pub files_removed: u64,
    pub files_skipped: u64,
}

impl AddAssign for CleanStats {
    fn add_assign(&mut self, rhs: Self) {
        self.bytes_freed += rhs.bytes_freed;
        self.files_removed += rhs.files_removed;
        self.files_skipped += rhs.files_skipped;
    }
}

/// Delete every file under `dir`, each with its own retry budget.
///
/// Only a failure to list `dir` itself is an error, as is `dir` being a
/// symlink. A subdirectory that cannot be listed contributes nothing and is
/// left in place.
pub fn clean_directory(dir: &Path, policy: RetryPolicy) -> Result<CleanStats, CleanError> {
    let listing_error = |source| CleanError::Listing {
        path: dir.to_path_buf(),
        source,
    };
    if fs::symlink_metadata(dir).map_err(listing_error)?.is_symlink() {
        return Err(CleanError::Symlink {
            path: dir.to_path_buf(),
        });
    }
    let entries = fs::read_dir(dir).map_err(listing_error)?;

    let mut stats = CleanStats::default();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                trace!("Clean: unreadable entry in {:?}: {}", dir, err);
                stats.files_skipped += 1;
                continue;
            }
        };
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir {
            match clean_directory(&path, policy) {
                Ok(sub) => {
                    stats += sub;
                    // Fails harmlessly while skipped files remain.
                    let _ = fs::remove_dir(&path);
                }
                Err(err) => debug!("Clean: {}", err),
            }
            continue;
        }

        let size = match fs::symlink_metadata(&path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                trace!("Clean: cannot stat {:?}: {}", path, err);
                stats.files_skipped += 1;
                continue;
            }
        };
        match delete_with_retry(&path, policy) {
            Ok(()) => {
                stats.bytes_freed += size;
                stats.files_removed += 1;
            }
            Err(err) => {
                debug!("Clean: skipping {}", err);
                stats.files_skipped += 1;
            }
        }
    }

    Ok(stats)
}
