//! Output module for reporting on crawl analytics
//!
//! This module handles:
//! - Building a report from an analytics snapshot
//! - Printing it to stdout
//! - Rendering it as a markdown file

mod markdown;
mod report;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use report::{print_report, CrawlReport};

use crate::analytics::load_snapshot;
use crate::AnteaterError;
use std::path::Path;

/// Loads the snapshot at `path` and builds a report from it
///
/// # Arguments
///
/// * `path` - Snapshot file written during a crawl
/// * `top_n` - How many of the most common words to keep
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Report over the snapshot
/// * `Err(AnteaterError)` - Snapshot missing or unreadable
pub fn report_from_file(path: &Path, top_n: usize) -> Result<CrawlReport, AnteaterError> {
    if !path.exists() {
        return Err(AnteaterError::Snapshot(format!(
            "no snapshot at {}; run a crawl first",
            path.display()
        )));
    }

    let snapshot = load_snapshot(path)?;
    Ok(CrawlReport::from_snapshot(&snapshot, top_n))
}
