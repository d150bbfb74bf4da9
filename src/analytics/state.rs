use crate::analytics::snapshot::{AnalyticsSnapshot, LongestPage};
use crate::url::{is_within_domain, CanonicalUrl};
use std::collections::{HashMap, HashSet};

/// The four aggregates the crawl maintains
///
/// Plain data with no locking of its own; [`crate::analytics::Analytics`]
/// wraps it in a mutex so the visited check and the updates that follow it
/// happen as one step.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsState {
    visited: HashSet<String>,
    word_freq: HashMap<String, u64>,
    subdomains: HashMap<String, u64>,
    longest_page: LongestPage,
}

impl AnalyticsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of a token
    pub fn record_token(&mut self, token: &str) {
        match self.word_freq.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.word_freq.insert(token.to_string(), 1);
            }
        }
    }

    /// Marks a page visited and updates the per-page aggregates
    ///
    /// Returns false, changing nothing, if the page was already visited.
    /// Otherwise the longest page is replaced when `token_count` is strictly
    /// greater, and the host's subdomain count is bumped if it lies within
    /// `analytics_domain`.
    pub fn record_page(
        &mut self,
        url: &CanonicalUrl,
        token_count: usize,
        analytics_domain: &str,
    ) -> bool {
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }

        let token_count = token_count as u64;
        if token_count > self.longest_page.word_count {
            self.longest_page = LongestPage {
                url: Some(url.as_str().to_string()),
                word_count: token_count,
            };
        }

        if let Some(host) = url.host() {
            if is_within_domain(analytics_domain, &host) {
                *self.subdomains.entry(host).or_insert(0) += 1;
            }
        }

        true
    }

    /// A snapshot if the visited count has just reached a multiple of `interval`
    pub fn maybe_snapshot(&self, interval: usize) -> Option<AnalyticsSnapshot> {
        let unique = self.visited.len();
        if interval > 0 && unique > 0 && unique % interval == 0 {
            Some(self.snapshot())
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let mut unique_urls: Vec<String> = self.visited.iter().cloned().collect();
        unique_urls.sort();

        AnalyticsSnapshot {
            unique_urls,
            word_freq: self.word_freq.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            subdomains: self.subdomains.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            longest_page: self.longest_page.clone(),
        }
    }

    pub fn unique_pages(&self) -> usize {
        self.visited.len()
    }

    pub fn word_count(&self, token: &str) -> u64 {
        self.word_freq.get(token).copied().unwrap_or(0)
    }

    pub fn total_words(&self) -> u64 {
        self.word_freq.values().sum()
    }

    pub fn subdomain_count(&self, host: &str) -> u64 {
        self.subdomains.get(host).copied().unwrap_or(0)
    }

    pub fn longest_page(&self) -> &LongestPage {
        &self.longest_page
    }
}
