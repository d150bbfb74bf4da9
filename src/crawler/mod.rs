//! Crawler module for page processing and link admission
//!
//! This module contains the per-page pipeline and a thin driver around it:
//! - HTTP fetching into a [`FetchResult`]
//! - Page processing: gates, text, tokens, analytics, links
//! - The scraper entry point: processing followed by the trap classifier
//! - An in-memory frontier and a concurrent crawl coordinator

mod coordinator;
mod fetcher;
mod frontier;
mod processor;
mod scrape;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, fetch_url, FetchResult, NO_RESPONSE};
pub use frontier::Frontier;
pub use processor::PageProcessor;
pub use scrape::Scraper;
