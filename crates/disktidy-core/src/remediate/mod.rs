/// Remediation: deleting selected targets and accounting for the result.
///
/// Targets are processed strictly in input order. A protected target is
/// never touched and never appears in the results. Every other target yields
/// exactly one [`Outcome`]; a failing target never stops the ones after it.
///
/// Two strategies are available:
/// - **Whole target (default):** [`delete_with_retry`] on the target path.
///   All-or-nothing: success reports the pre-deletion size snapshot, failure
///   reports zero.
/// - **Best effort:** [`clean_directory`] empties the target file by file and
///   reports what was actually freed and skipped.
pub mod clean;
pub mod delete;
pub mod progress;

pub use clean::{clean_directory, CleanStats};
pub use delete::{delete_with_retry, RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF};
pub use progress::{progress_channel, RemediationProgress, PROGRESS_CHANNEL_CAPACITY};

use crate::model::{Outcome, Summary, Target};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// How a non-protected target is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    WholeTarget,
    BestEffort,
}

/// Serializable remediation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemediationConfig {
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub strategy: Strategy,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF.as_millis() as u64,
            strategy: Strategy::default(),
        }
    }
}

impl RemediationConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

/// Runs remediation passes over discovered targets.
pub struct Remediator {
    dry_run: bool,
    strategy: Strategy,
    policy: RetryPolicy,
    cancel: Option<Arc<AtomicBool>>,
    progress: Option<Sender<RemediationProgress>>,
}

impl Remediator {
    /// Whole-target strategy with the default retry policy.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            strategy: Strategy::default(),
            policy: RetryPolicy::default(),
            cancel: None,
            progress: None,
        }
    }

    pub fn from_config(config: &RemediationConfig, dry_run: bool) -> Self {
        Self::new(dry_run)
            .with_strategy(config.strategy)
            .with_retry_policy(config.retry_policy())
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stop before the next target once `cancel` is raised.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_progress(mut self, tx: Sender<RemediationProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Remediate every target in order and return the aggregate summary.
    pub fn run(&self, targets: &[Target]) -> Summary {
        let start = Instant::now();
        let total = targets.len();
        let mut summary = Summary::new(total);

        info!(
            "Remediating {} target(s){}",
            total,
            if self.dry_run { " (dry run)" } else { "" }
        );
        self.send(RemediationProgress::Started {
            total,
            dry_run: self.dry_run,
        });

        for (i, target) in targets.iter().enumerate() {
            if self.is_cancelled() {
                info!("Remediation cancelled after {} target(s)", summary.attempted());
                summary.cancelled = true;
                self.send(RemediationProgress::Cancelled);
                break;
            }

            if target.protected {
                debug!("Skipping protected target {} ({:?})", target.name, target.path);
                self.send(RemediationProgress::Protected {
                    name: target.name.clone(),
                });
                continue;
            }

            self.send(RemediationProgress::Processing {
                index: i + 1,
                total,
                name: target.name.clone(),
            });

            let outcome = self.remediate_target(target);
            self.send(RemediationProgress::Finished {
                name: target.name.clone(),
                success: outcome.success,
                space_freed: outcome.space_freed,
            });
            summary.record(outcome);
        }

        summary.duration = start.elapsed();
        info!(
            "Remediation finished: {} succeeded, {} failed, {} bytes freed, {} files removed in {:?}",
            summary.success_count,
            summary.failure_count,
            summary.total_space_freed,
            summary.total_files_removed,
            summary.duration
        );
        if !summary.cancelled {
            self.send(RemediationProgress::Complete {
                duration: summary.duration,
                success_count: summary.success_count,
                failure_count: summary.failure_count,
            });
        }
        summary
    }

    /// Remediate one non-protected target.
    pub fn remediate_target(&self, target: &Target) -> Outcome {
        if self.dry_run {
            return Outcome::succeeded(target.clone(), target.size, target.item_count);
        }

        match self.strategy {
            Strategy::BestEffort if is_real_dir(&target.path) => self.clean_target(target),
            _ => self.delete_target(target),
        }
    }

    fn delete_target(&self, target: &Target) -> Outcome {
        // Snapshot before deleting: a partial failure must not be re-measured.
        let (size, count) = (target.size, target.item_count);
        match delete_with_retry(&target.path, self.policy) {
            Ok(()) => Outcome::succeeded(target.clone(), size, count),
            Err(err) => {
                warn!("Failed to remediate {}: {}", target.name, err);
                Outcome::failed(target.clone(), err)
            }
        }
    }

    fn clean_target(&self, target: &Target) -> Outcome {
        match clean_directory(&target.path, self.policy) {
            Ok(stats) => {
                let mut outcome =
                    Outcome::succeeded(target.clone(), stats.bytes_freed, stats.files_removed);
                outcome.files_skipped = stats.files_skipped;
                if stats.files_skipped > 0 {
                    debug!("{}: {} file(s) left in place", target.name, stats.files_skipped);
                }
                outcome
            }
            Err(err) => {
                warn!("Failed to clean {}: {}", target.name, err);
                Outcome::failed(target.clone(), err)
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Never blocks: when the receiver is not draining and the channel is
    /// full, the message is dropped.
    fn send(&self, message: RemediationProgress) {
        if let Some(tx) = &self.progress {
            if tx.try_send(message).is_err() {
                trace!("Progress channel full or closed, message dropped");
            }
        }
    }
}

/// A directory that is not reached through a symlink. A linked target is
/// unlinked whole, never emptied.
fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.is_dir())
}

/// Remediate `targets` with the whole-target strategy and default retries.
pub fn remediate(targets: &[Target], dry_run: bool) -> Summary {
    Remediator::new(dry_run).run(targets)
}
