/// DiskTidy Core: disk usage survey and remediation engine.
///
/// This crate contains all business logic with zero terminal or UI
/// dependencies. Frontends call into it and render the returned models.
///
/// # Modules
///
/// - [`model`]: Survey tree nodes, cleanup targets, and outcome reports.
/// - [`scanner`]: Flat size scanning and depth-bounded tree surveys.
/// - [`analysis`]: Read-only queries over a finished survey tree.
/// - [`catalog`]: Well-known maintenance locations and the protected-path whitelist.
/// - [`remediate`]: Retry-bounded deletion and outcome accounting.
/// - [`task`]: Data-driven maintenance tasks.
/// - [`export`]: CSV export of reports.
/// - [`config`]: Engine configuration loaded from JSON.
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod remediate;
pub mod scanner;
pub mod task;

pub use error::{CleanError, ConfigError, DeleteError, ExportError, SurveyError, TaskError};
