//! Crawl report built from an analytics snapshot

use crate::analytics::{AnalyticsSnapshot, LongestPage};

/// The answers a crawl is expected to produce
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Number of unique pages
    pub unique_pages: usize,

    /// Page with the most tokens
    pub longest_page: LongestPage,

    /// Most common words, by count descending then word ascending
    pub top_words: Vec<(String, u64)>,

    /// Subdomains of the analytics domain with page counts, alphabetical
    pub subdomains: Vec<(String, u64)>,

    /// Distinct words seen
    pub distinct_words: usize,
}

impl CrawlReport {
    /// Builds a report from a snapshot
    ///
    /// # Examples
    ///
    /// ```
    /// use anteater::analytics::AnalyticsSnapshot;
    /// use anteater::output::CrawlReport;
    ///
    /// let mut snapshot = AnalyticsSnapshot::default();
    /// snapshot.word_freq.insert("research".to_string(), 4);
    /// snapshot.word_freq.insert("anteater".to_string(), 9);
    ///
    /// let report = CrawlReport::from_snapshot(&snapshot, 1);
    /// assert_eq!(report.top_words, vec![("anteater".to_string(), 9)]);
    /// ```
    pub fn from_snapshot(snapshot: &AnalyticsSnapshot, top_n: usize) -> Self {
        let mut top_words: Vec<(String, u64)> = snapshot
            .word_freq
            .iter()
            .map(|(word, count)| (word.clone(), *count))
            .collect();
        top_words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_words.truncate(top_n);

        // BTreeMap iteration is already alphabetical
        let subdomains = snapshot
            .subdomains
            .iter()
            .map(|(host, count)| (host.clone(), *count))
            .collect();

        Self {
            unique_pages: snapshot.unique_urls.len(),
            longest_page: snapshot.longest_page.clone(),
            top_words,
            subdomains,
            distinct_words: snapshot.word_freq.len(),
        }
    }
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Unique pages: {}", report.unique_pages);
    match &report.longest_page.url {
        Some(url) => println!(
            "Longest page: {} ({} words)",
            url, report.longest_page.word_count
        ),
        None => println!("Longest page: none"),
    }
    println!("Distinct words: {}", report.distinct_words);
    println!();

    if !report.top_words.is_empty() {
        println!("Top {} words:", report.top_words.len());
        for (rank, (word, count)) in report.top_words.iter().enumerate() {
            println!("  {:>3}. {} ({})", rank + 1, word, count);
        }
        println!();
    }

    println!("Subdomains ({}):", report.subdomains.len());
    for (host, count) in &report.subdomains {
        println!("  {}, {}", host, count);
    }
}
