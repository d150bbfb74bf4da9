//! Integration tests for the per-page pipeline
//!
//! These drive the scraper the way a frontier would, one fetch result at a
//! time, and check both the links it hands back and the analytics it keeps.

use anteater::analytics::{load_snapshot, Analytics, JsonSnapshotWriter};
use anteater::config::Config;
use anteater::crawler::{FetchResult, Scraper, NO_RESPONSE};
use anteater::text::StopWords;
use anteater::url::{TrapClassifier, Verdict};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Builds a scraper with default rules whose snapshots land in `dir`
fn create_test_scraper(dir: &Path, snapshot_interval: usize) -> Scraper {
    let mut config = Config::default();
    config.limits.snapshot_interval = snapshot_interval;

    let analytics = Arc::new(Analytics::new(
        Box::new(JsonSnapshotWriter::new(dir.join("stats.json"))),
        snapshot_interval,
        config.scope.analytics_domain.clone(),
    ));

    Scraper::from_config(&config, StopWords::bundled(), analytics).expect("default config is valid")
}

/// An HTML page with `words` distinct tokens and the given links
fn page_with_words(words: usize, links: &[&str]) -> String {
    let text: Vec<String> = (0..words).map(|i| format!("anteater{}", i)).collect();
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">x</a>", href))
        .collect();

    format!(
        "<html><body><p>{}</p>{}</body></html>",
        text.join(" "),
        anchors
    )
}

#[test]
fn test_page_from_ics_yields_resolved_link() {
    let dir = TempDir::new().unwrap();
    let scraper = create_test_scraper(dir.path(), 25);
    let analytics = Arc::clone(scraper.processor().analytics());

    let fetch = FetchResult::html(
        "https://www.ics.uci.edu/",
        page_with_words(320, &["/page2"]),
    );
    let links = scraper.scrape(&fetch.url, &fetch);

    assert!(links.contains(&"https://www.ics.uci.edu/page2".to_string()));
    assert_eq!(analytics.unique_pages(), 1);
    assert_eq!(analytics.subdomain_count("www.ics.uci.edu"), 1);
    assert_eq!(analytics.word_count("anteater0"), 1);
}

#[test]
fn test_duplicate_submission_counts_once() {
    let dir = TempDir::new().unwrap();
    let scraper = create_test_scraper(dir.path(), 25);
    let analytics = Arc::clone(scraper.processor().analytics());

    let fetch = FetchResult::html(
        "https://www.ics.uci.edu/about",
        page_with_words(300, &["/people", "https://www.cs.uci.edu/"]),
    );

    let first = scraper.scrape(&fetch.url, &fetch);
    let total_after_first = analytics.total_words();
    let second = scraper.scrape(&fetch.url, &fetch);

    assert_eq!(first, second);
    assert_eq!(second.len(), 2);
    assert_eq!(analytics.total_words(), total_after_first);
    assert_eq!(analytics.subdomain_count("www.ics.uci.edu"), 1);
    assert_eq!(analytics.unique_pages(), 1);
}

#[test]
fn test_fragment_variants_are_one_page() {
    let dir = TempDir::new().unwrap();
    let scraper = create_test_scraper(dir.path(), 25);
    let analytics = Arc::clone(scraper.processor().analytics());

    let body = page_with_words(300, &[]);
    for url in [
        "https://www.stat.uci.edu/courses",
        "https://www.stat.uci.edu/courses#fall",
        "https://www.stat.uci.edu/courses#spring",
    ] {
        scraper.scrape(url, &FetchResult::html(url, body.clone()));
    }

    assert_eq!(analytics.unique_pages(), 1);
    assert_eq!(analytics.word_count("anteater7"), 1);
}

#[test]
fn test_not_found_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let scraper = create_test_scraper(dir.path(), 25);
    let analytics = Arc::clone(scraper.processor().analytics());

    let links = scraper.scrape(
        "https://www.ics.uci.edu/missing",
        &FetchResult::failed("https://www.ics.uci.edu/missing", 404),
    );
    let unreachable = scraper.scrape(
        "https://www.ics.uci.edu/down",
        &FetchResult::failed("https://www.ics.uci.edu/down", NO_RESPONSE),
    );

    assert!(links.is_empty());
    assert!(unreachable.is_empty());
    assert_eq!(analytics.unique_pages(), 0);
    assert_eq!(analytics.total_words(), 0);
}

#[test]
fn test_wiki_media_page_is_rejected() {
    let classifier = TrapClassifier::from_config(&Config::default()).unwrap();
    let url = "https://wiki.ics.uci.edu/doku.php?do=media&image=x";

    assert!(!classifier.is_valid(url));
    assert_eq!(classifier.verdict(url), Verdict::Reject("host-rule"));
}

#[test]
fn test_trap_links_are_filtered_from_output() {
    let dir = TempDir::new().unwrap();
    let scraper = create_test_scraper(dir.path(), 25);

    let fetch = FetchResult::html(
        "https://www.informatics.uci.edu/",
        page_with_words(
            300,
            &[
                "/research",
                "/files/syllabus.pdf",
                "/events/2024-01-01",
                "https://www.google.com/",
                "https://wiki.ics.uci.edu/doku.php?do=export",
                "mailto:office@uci.edu",
            ],
        ),
    );

    let links = scraper.scrape(&fetch.url, &fetch);
    assert_eq!(links, vec!["https://www.informatics.uci.edu/research".to_string()]);
}

#[test]
fn test_snapshot_after_twenty_five_pages() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("stats.json");
    let scraper = create_test_scraper(dir.path(), 25);

    let body = page_with_words(300, &[]);
    for i in 0..24 {
        let url = format!("https://www.ics.uci.edu/page{}", i);
        scraper.scrape(&url, &FetchResult::html(url.clone(), body.clone()));
    }
    assert!(!snapshot_path.exists());

    let url = "https://vision.ics.uci.edu/";
    scraper.scrape(url, &FetchResult::html(url, body.clone()));

    let snapshot = load_snapshot(&snapshot_path).unwrap();
    assert_eq!(snapshot.unique_urls.len(), 25);
    assert_eq!(snapshot.subdomains.get("www.ics.uci.edu"), Some(&24));
    assert_eq!(snapshot.subdomains.get("vision.ics.uci.edu"), Some(&1));
    assert_eq!(snapshot.word_freq.get("anteater0"), Some(&25));
    assert_eq!(snapshot.longest_page.word_count, 300);
}

#[test]
fn test_longest_page_keeps_first_on_tie() {
    let dir = TempDir::new().unwrap();
    let scraper = create_test_scraper(dir.path(), 25);
    let analytics = Arc::clone(scraper.processor().analytics());

    let body = page_with_words(300, &[]);
    for url in ["https://www.cs.uci.edu/a", "https://www.cs.uci.edu/b"] {
        scraper.scrape(url, &FetchResult::html(url, body.clone()));
    }

    let longest = analytics.longest_page();
    assert_eq!(longest.url.as_deref(), Some("https://www.cs.uci.edu/a"));
    assert_eq!(longest.word_count, 300);
}
