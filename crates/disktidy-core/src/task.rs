/// Data-driven maintenance tasks.
///
/// A [`Task`] pairs descriptive metadata with an [`Action`]. Filesystem
/// actions are built in; anything that needs an external process is plugged
/// in by the caller through [`TaskAction`], which keeps the task inventory
/// inspectable and testable without touching the OS.
use crate::catalog::{BaseDir, BaseDirs};
use crate::error::TaskError;
use crate::remediate::{clean_directory, delete_with_retry, RetryPolicy};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Expected effect of a task on the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// A caller-supplied task capability.
pub trait TaskAction: Send + Sync {
    fn execute(&self) -> Result<(), TaskError>;
}

/// What a task does when executed.
#[derive(Clone)]
pub enum Action {
    /// Remove a file or directory with the bounded retry routine.
    DeleteTarget(PathBuf),
    /// Empty a directory file by file, keeping the directory.
    CleanDirectory(PathBuf),
    Custom(Arc<dyn TaskAction>),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::DeleteTarget(p) => f.debug_tuple("DeleteTarget").field(p).finish(),
            Action::CleanDirectory(p) => f.debug_tuple("CleanDirectory").field(p).finish(),
            Action::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub category: String,
    pub impact: Impact,
    pub action: Action,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        impact: Impact,
        action: Action,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            impact,
            action,
        }
    }

    /// Run the action. Filesystem actions use `policy` for retries.
    pub fn execute(&self, policy: RetryPolicy) -> Result<(), TaskError> {
        match &self.action {
            Action::DeleteTarget(path) => Ok(delete_with_retry(path, policy)?),
            Action::CleanDirectory(path) => {
                let stats = clean_directory(path, policy)?;
                debug!(
                    "Task {}: {} file(s) removed, {} skipped",
                    self.name, stats.files_removed, stats.files_skipped
                );
                Ok(())
            }
            Action::Custom(action) => action.execute(),
        }
    }
}

/// Result of running a batch of tasks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Descriptions of tasks that completed.
    pub completed: Vec<String>,
    /// Descriptions and error messages of tasks that failed.
    pub failed_tasks: Vec<(String, String)>,
}

/// Run every task in order. In a dry run nothing executes and every task
/// counts as completed.
pub fn run_tasks(tasks: &[Task], dry_run: bool, policy: RetryPolicy) -> TaskReport {
    let mut report = TaskReport {
        total: tasks.len(),
        ..TaskReport::default()
    };

    for task in tasks {
        if dry_run {
            report.successful += 1;
            report.completed.push(task.description.clone());
            continue;
        }
        match task.execute(policy) {
            Ok(()) => {
                report.successful += 1;
                report.completed.push(task.description.clone());
            }
            Err(err) => {
                warn!("Task {} failed: {}", task.name, err);
                report.failed += 1;
                report
                    .failed_tasks
                    .push((task.description.clone(), err.to_string()));
            }
        }
    }
    report
}

/// Built-in filesystem tasks whose base directories are configured.
pub fn builtin_tasks(dirs: &BaseDirs) -> Vec<Task> {
    let mut tasks = Vec::new();
    if let Some(local) = dirs.get(BaseDir::LocalAppData) {
        tasks.push(Task::new(
            "clear_icon_cache",
            "Clear icon cache to fix display issues",
            "UI",
            Impact::Low,
            Action::DeleteTarget(local.join("IconCache.db")),
        ));
    }
    if let Some(windir) = dirs.get(BaseDir::WinDir) {
        tasks.push(Task::new(
            "clear_prefetch",
            "Empty the prefetch folder",
            "Storage",
            Impact::Low,
            Action::CleanDirectory(windir.join("Prefetch")),
        ));
    }
    tasks
}
