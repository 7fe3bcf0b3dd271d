/// Retry-bounded whole-path deletion.
///
/// Files held open by other processes are the usual reason a cache or temp
/// deletion fails, and they are often released within moments. The routine
/// retries the whole removal a fixed number of times with a short sleep in
/// between; it never tracks individual files.
use crate::error::DeleteError;
use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts. Values below 1 are treated as 1.
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Same attempt count, no sleeping between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Duration::ZERO,
        }
    }
}

/// Remove `path` (file or whole directory tree), retrying per `policy`.
///
/// A path that does not exist is already deleted and returns `Ok(())`.
pub fn delete_with_retry(path: &Path, policy: RetryPolicy) -> Result<(), DeleteError> {
    retry(path, policy, || remove_path(path))
}

fn remove_path(path: &Path) -> io::Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(err) => Err(err),
    };
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn retry<F>(path: &Path, policy: RetryPolicy, mut op: F) -> Result<(), DeleteError>
where
    F: FnMut() -> io::Result<()>,
{
    let attempts = policy.max_retries.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(()) => return Ok(()),
            Err(source) if attempt >= attempts => {
                return Err(DeleteError {
                    path: path.to_path_buf(),
                    attempts,
                    source,
                });
            }
            Err(err) => {
                debug!(
                    "Delete attempt {}/{} for {:?} failed: {}",
                    attempt, attempts, path, err
                );
                thread::sleep(policy.backoff);
                attempt += 1;
            }
        }
    }
}
