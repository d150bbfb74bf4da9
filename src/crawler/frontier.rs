//! In-memory frontier
//!
//! A FIFO queue that ignores URLs it has already queued once. The scraper
//! hands back the same links over and over; this is where they collapse.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a URL unless it was queued before
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Every URL ever queued
    pub fn discovered(&self) -> usize {
        self.seen.len()
    }
}
