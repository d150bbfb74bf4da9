//! Markdown report generation

use crate::output::report::CrawlReport;
use crate::AnteaterError;
use chrono::Utc;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Writes a markdown report to `output_path`
///
/// The parent directory is created if it does not exist.
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(AnteaterError)` - Failed to write the report
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> Result<(), AnteaterError> {
    let markdown = format_markdown_report(report);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Anteater Crawl Report\n\n");
    md.push_str(&format!(
        "_Generated {}_\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Unique Pages\n\n");
    md.push_str(&format!("{}\n\n", report.unique_pages));

    md.push_str("## Longest Page\n\n");
    match &report.longest_page.url {
        Some(url) => md.push_str(&format!(
            "<{}> with {} words\n\n",
            url, report.longest_page.word_count
        )),
        None => md.push_str("No pages recorded\n\n"),
    }

    md.push_str(&format!("## Top {} Words\n\n", report.top_words.len()));
    if !report.top_words.is_empty() {
        md.push_str("| Rank | Word | Count |\n");
        md.push_str("|------|------|-------|\n");
        for (rank, (word, count)) in report.top_words.iter().enumerate() {
            md.push_str(&format!("| {} | {} | {} |\n", rank + 1, word, count));
        }
        md.push('\n');
    }

    md.push_str("## Subdomains\n\n");
    md.push_str(&format!("Total: {}\n\n", report.subdomains.len()));
    for (host, count) in &report.subdomains {
        md.push_str(&format!("- {}, {}\n", host, count));
    }
    md.push('\n');

    md
}
