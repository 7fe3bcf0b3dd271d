/// Remediation progress reporting: lightweight messages sent from the
/// remediation loop to a frontend via a crossbeam channel.
use crossbeam_channel::{bounded, Receiver, Sender};
use std::time::Duration;

/// Maximum number of progress messages that may queue up in the channel.
///
/// A pass emits two messages per target plus a handful of terminal ones, so
/// this only fills if the receiver stops draining entirely.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Progress updates sent while targets are processed.
#[derive(Debug, Clone, PartialEq)]
pub enum RemediationProgress {
    /// The pass began.
    Started { total: usize, dry_run: bool },
    /// A target is about to be processed (1-based `index`).
    Processing {
        index: usize,
        total: usize,
        name: String,
    },
    /// A protected target was passed over.
    Protected { name: String },
    /// A target finished.
    Finished {
        name: String,
        success: bool,
        space_freed: u64,
    },
    /// All targets were processed.
    Complete {
        duration: Duration,
        success_count: usize,
        failure_count: usize,
    },
    /// The pass stopped early on a cancel request.
    Cancelled,
}

/// A bounded channel sized for remediation progress.
pub fn progress_channel() -> (Sender<RemediationProgress>, Receiver<RemediationProgress>) {
    bounded(PROGRESS_CHANNEL_CAPACITY)
}
