/// Per-target outcomes and the aggregate remediation summary.
use super::target::Target;
use serde::Serialize;
use std::time::Duration;

/// Result of remediating a single target.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub target: Target,
    pub success: bool,
    /// Bytes freed. Zero on failure under the whole-target strategy.
    pub space_freed: u64,
    /// Files removed. Zero on failure under the whole-target strategy.
    pub files_removed: u64,
    /// Files left behind. Only the best-effort strategy reports these.
    pub files_skipped: u64,
    pub error: Option<String>,
}

impl Outcome {
    /// A successful outcome freeing `space_freed` bytes across `files_removed` files.
    pub fn succeeded(target: Target, space_freed: u64, files_removed: u64) -> Self {
        Self {
            target,
            success: true,
            space_freed,
            files_removed,
            files_skipped: 0,
            error: None,
        }
    }

    /// A failed outcome with nothing freed.
    pub fn failed(target: Target, error: impl ToString) -> Self {
        Self {
            target,
            success: false,
            space_freed: 0,
            files_removed: 0,
            files_skipped: 0,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate report of one remediation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Every input target, protected ones included.
    pub total_targets: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub total_space_freed: u64,
    pub total_files_removed: u64,
    pub total_files_skipped: u64,
    /// `true` if the pass stopped early on a cancel request.
    pub cancelled: bool,
    pub duration: Duration,
    /// Outcomes of attempted targets, in input order.
    pub results: Vec<Outcome>,
}

impl Summary {
    pub fn new(total_targets: usize) -> Self {
        Self {
            total_targets,
            ..Self::default()
        }
    }

    /// Fold one outcome into the running totals.
    ///
    /// Freed space and removed files only count toward the totals when the
    /// outcome succeeded. Skipped files count either way.
    pub fn record(&mut self, outcome: Outcome) {
        if outcome.success {
            self.success_count += 1;
            self.total_space_freed += outcome.space_freed;
            self.total_files_removed += outcome.files_removed;
        } else {
            self.failure_count += 1;
        }
        self.total_files_skipped += outcome.files_skipped;
        self.results.push(outcome);
    }

    /// Number of targets actually attempted.
    #[inline]
    pub fn attempted(&self) -> usize {
        self.success_count + self.failure_count
    }
}
