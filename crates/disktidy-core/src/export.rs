/// CSV export of remediation summaries and survey leaf lists.
use crate::error::ExportError;
use crate::model::{Node, Summary};
use serde::Serialize;
use std::io;
use std::path::Path;

#[derive(Serialize)]
struct OutcomeRow<'a> {
    name: &'a str,
    category: &'a str,
    path: String,
    success: bool,
    space_freed: u64,
    files_removed: u64,
    files_skipped: u64,
    error: &'a str,
}

#[derive(Serialize)]
struct LeafRow {
    path: String,
    size: u64,
    large: bool,
}

/// Write one row per outcome in `summary`.
pub fn write_summary_csv<W: io::Write>(summary: &Summary, writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for outcome in &summary.results {
        csv.serialize(OutcomeRow {
            name: &outcome.target.name,
            category: outcome.target.category.label(),
            path: outcome.target.path.to_string_lossy().into_owned(),
            success: outcome.success,
            space_freed: outcome.space_freed,
            files_removed: outcome.files_removed,
            files_skipped: outcome.files_skipped,
            error: outcome.error.as_deref().unwrap_or(""),
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn export_summary_csv(summary: &Summary, path: &Path) -> Result<(), ExportError> {
    write_summary_csv(summary, std::fs::File::create(path)?)
}

/// Write one row per file node, e.g. the output of `collect_leaves` or `top_n_by_size`.
pub fn write_leaves_csv<W: io::Write>(leaves: &[&Node], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for leaf in leaves {
        csv.serialize(LeafRow {
            path: leaf.path.to_string_lossy().into_owned(),
            size: leaf.size,
            large: leaf.is_large_file(),
        })?;
    }
    csv.flush()?;
    Ok(())
}
