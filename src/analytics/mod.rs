//! Crawl analytics
//!
//! This module keeps the running aggregates for a crawl:
//! - the set of unique (fragment-free) pages processed
//! - cumulative word frequencies
//! - pages per subdomain of the analytics domain
//! - the longest page by token count
//!
//! All four live behind a single mutex. Snapshots are copied out under the
//! lock and written after it is released.

mod snapshot;
mod state;

pub use snapshot::{load_snapshot, AnalyticsSnapshot, JsonSnapshotWriter, LongestPage, SnapshotSink};
pub use state::AnalyticsState;

use crate::config::Config;
use crate::url::CanonicalUrl;
use crate::AnteaterError;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared analytics for one crawl
///
/// Constructed at crawl start and handed to every worker behind an `Arc`.
pub struct Analytics {
    state: Mutex<AnalyticsState>,
    sink: Box<dyn SnapshotSink>,
    snapshot_interval: usize,
    analytics_domain: String,
    /// Unique-page count of the newest snapshot written; serializes writes
    last_written: Mutex<Option<usize>>,
}

impl Analytics {
    /// Creates empty analytics
    ///
    /// # Arguments
    ///
    /// * `sink` - Where snapshots are written
    /// * `snapshot_interval` - Write a snapshot every time this many new pages are seen
    /// * `analytics_domain` - Hosts under this domain are counted per subdomain
    pub fn new(
        sink: Box<dyn SnapshotSink>,
        snapshot_interval: usize,
        analytics_domain: impl Into<String>,
    ) -> Self {
        Self {
            state: Mutex::new(AnalyticsState::new()),
            sink,
            snapshot_interval,
            analytics_domain: analytics_domain.into().to_lowercase(),
            last_written: Mutex::new(None),
        }
    }

    /// Creates analytics writing JSON snapshots to the configured path
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Box::new(JsonSnapshotWriter::new(&config.output.snapshot_path)),
            config.limits.snapshot_interval,
            config.scope.analytics_domain.clone(),
        )
    }

    fn lock_state(&self) -> MutexGuard<'_, AnalyticsState> {
        // A panicked worker leaves counts that are still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a fetched page if it has not been seen before
    ///
    /// The visited check, the token counts, the longest-page and subdomain
    /// updates all happen under one lock acquisition, so two workers racing
    /// on the same URL count it once. If this page brings the unique count to
    /// a multiple of the snapshot interval, a snapshot is written afterwards.
    ///
    /// # Returns
    ///
    /// `true` if the page was new and counted, `false` if it was a revisit.
    pub fn observe_page(&self, url: &CanonicalUrl, tokens: &[String]) -> bool {
        let due = {
            let mut state = self.lock_state();
            if !state.record_page(url, tokens.len(), &self.analytics_domain) {
                return false;
            }
            for token in tokens {
                state.record_token(token);
            }
            state.maybe_snapshot(self.snapshot_interval)
        };

        if let Some(snapshot) = due {
            self.write_best_effort(&snapshot);
        }

        true
    }

    /// Copies the current aggregates
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        self.lock_state().snapshot()
    }

    /// Writes the current aggregates regardless of the interval
    ///
    /// Called once at the end of a crawl. Unlike periodic snapshots, the
    /// error is returned to the caller.
    pub fn flush(&self) -> Result<(), AnteaterError> {
        let snapshot = self.snapshot();
        self.write(&snapshot)
    }

    fn write(&self, snapshot: &AnalyticsSnapshot) -> Result<(), AnteaterError> {
        let unique = snapshot.unique_urls.len();
        let mut last_written = self
            .last_written
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // A slower worker may arrive with an older snapshot
        if let Some(prev) = *last_written {
            if prev > unique {
                tracing::debug!("Skipping stale snapshot ({} < {} pages)", unique, prev);
                return Ok(());
            }
        }

        self.sink.write(snapshot)?;
        *last_written = Some(unique);
        tracing::info!(
            "Wrote analytics snapshot ({} unique pages) to {}",
            unique,
            self.sink.describe()
        );
        Ok(())
    }

    fn write_best_effort(&self, snapshot: &AnalyticsSnapshot) {
        if let Err(e) = self.write(snapshot) {
            tracing::warn!(
                "Failed to write analytics snapshot to {}: {}",
                self.sink.describe(),
                e
            );
        }
    }

    pub fn unique_pages(&self) -> usize {
        self.lock_state().unique_pages()
    }

    pub fn word_count(&self, token: &str) -> u64 {
        self.lock_state().word_count(token)
    }

    pub fn total_words(&self) -> u64 {
        self.lock_state().total_words()
    }

    pub fn subdomain_count(&self, host: &str) -> u64 {
        self.lock_state().subdomain_count(host)
    }

    pub fn longest_page(&self) -> LongestPage {
        self.lock_state().longest_page().clone()
    }
}
