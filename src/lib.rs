//! Anteater: link discovery and crawl admission for a campus web crawler
//!
//! This crate decides which links a crawler restricted to a handful of
//! university subdomains should follow, and keeps running analytics over the
//! pages it has seen (unique pages, word frequencies, per-subdomain counts and
//! the longest page).

pub mod analytics;
pub mod config;
pub mod crawler;
pub mod output;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Anteater operations
#[derive(Debug, Error)]
pub enum AnteaterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),
}

// Re-export commonly used types
pub use analytics::{Analytics, AnalyticsSnapshot, JsonSnapshotWriter, LongestPage};
pub use config::Config;
pub use crawler::{FetchResult, PageProcessor, Scraper};
pub use url::{CanonicalUrl, TrapClassifier, Verdict};
