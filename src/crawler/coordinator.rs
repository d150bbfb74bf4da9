//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the scraper end to end:
//! - Seeding the frontier
//! - Running up to `workers` fetches at once
//! - Feeding admitted links back into the frontier
//! - Stopping on Ctrl-C or when the page cap is reached
//! - Writing a final analytics snapshot

use crate::analytics::Analytics;
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_url};
use crate::crawler::frontier::Frontier;
use crate::crawler::scrape::Scraper;
use crate::text::load_stopwords;
use crate::url::CanonicalUrl;
use crate::AnteaterError;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Totals for a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Pages requested
    pub pages_fetched: u64,
    /// Distinct URLs queued, seeds included
    pub urls_discovered: u64,
    /// Unique pages counted by analytics
    pub unique_pages: u64,
    /// True if the crawl stopped on Ctrl-C
    pub interrupted: bool,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    scraper: Arc<Scraper>,
    analytics: Arc<Analytics>,
    frontier: Frontier,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client, loads stopwords (fetching the supplementary
    /// list if one is configured), creates empty analytics and seeds the
    /// frontier.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(AnteaterError)` - Client or classifier could not be built
    pub async fn new(config: Config) -> Result<Self, AnteaterError> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout_secs)?;
        let stopwords = load_stopwords(&config.stopwords, &client).await;
        tracing::info!("Using {} stopwords", stopwords.len());

        let analytics = Arc::new(Analytics::from_config(&config));
        let scraper = Scraper::from_config(&config, stopwords, Arc::clone(&analytics))?;

        let mut frontier = Frontier::new();
        for seed in &config.crawler.seeds {
            let seed = CanonicalUrl::parse(seed)?;
            if scraper.classifier().is_valid(seed.as_str()) {
                frontier.push(seed.into_string());
            } else {
                tracing::warn!("Seed {} is rejected by the trap rules; skipping", seed);
            }
        }
        tracing::info!("Seeded frontier with {} URLs", frontier.len());

        Ok(Self {
            config: Arc::new(config),
            client,
            scraper: Arc::new(scraper),
            analytics,
            frontier,
        })
    }

    pub fn analytics(&self) -> Arc<Analytics> {
        Arc::clone(&self.analytics)
    }

    /// Runs the main crawl loop
    ///
    /// Pages are fetched and scraped on tokio tasks; the frontier is only
    /// touched from this loop. When the frontier is empty and nothing is in
    /// flight, or the page cap is hit, or Ctrl-C arrives, in-flight pages
    /// are drained and a final snapshot is written.
    pub async fn run(&mut self) -> Result<CrawlOutcome, AnteaterError> {
        let workers = self.config.crawler.workers.max(1) as usize;
        let max_pages = self.config.crawler.max_pages;
        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);
        let max_content_length = self.config.limits.max_content_length;

        let start_time = Instant::now();
        let mut in_flight = JoinSet::new();
        let mut pages_fetched: u64 = 0;
        let mut pages_done: u64 = 0;
        let mut stopping = false;
        let mut interrupted = false;
        let mut listening = true;

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        tracing::info!("Starting crawl with {} worker(s)", workers);

        loop {
            while !stopping && in_flight.len() < workers {
                if max_pages > 0 && pages_fetched >= max_pages {
                    tracing::info!("Reached page cap of {}", max_pages);
                    stopping = true;
                    break;
                }

                let Some(url) = self.frontier.pop() else {
                    break;
                };
                pages_fetched += 1;

                let client = self.client.clone();
                let scraper = Arc::clone(&self.scraper);
                in_flight.spawn(async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let fetch = fetch_url(&client, &url, max_content_length).await;

                    // Parsing and snapshot writes are blocking work
                    let scraped =
                        tokio::task::spawn_blocking(move || scraper.scrape(&url, &fetch)).await;
                    match scraped {
                        Ok(links) => links,
                        Err(e) => {
                            tracing::error!("Scrape task failed: {}", e);
                            Vec::new()
                        }
                    }
                });
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                joined = in_flight.join_next() => {
                    match joined {
                        Some(Ok(links)) => {
                            for link in links {
                                self.frontier.push(link);
                            }
                        }
                        Some(Err(e)) => tracing::error!("Page task failed: {}", e),
                        None => {}
                    }

                    pages_done += 1;
                    if pages_done % 10 == 0 {
                        let rate = pages_done as f64 / start_time.elapsed().as_secs_f64();
                        tracing::info!(
                            "Progress: {} pages fetched, {} unique, {} in frontier, {:.2} pages/sec",
                            pages_done,
                            self.analytics.unique_pages(),
                            self.frontier.len(),
                            rate
                        );
                    }
                }
                result = &mut shutdown, if listening && !stopping => {
                    listening = false;
                    if interrupt_requested(result) {
                        tracing::warn!("Interrupted; finishing {} in-flight page(s)", in_flight.len());
                        stopping = true;
                        interrupted = true;
                    }
                }
            }
        }

        if let Err(e) = self.analytics.flush() {
            tracing::error!("Failed to write final analytics snapshot: {}", e);
        }

        let outcome = CrawlOutcome {
            pages_fetched,
            urls_discovered: self.frontier.discovered() as u64,
            unique_pages: self.analytics.unique_pages() as u64,
            interrupted,
        };

        tracing::info!(
            "Crawl finished: {} pages fetched, {} unique pages, {} URLs discovered in {:?}",
            outcome.pages_fetched,
            outcome.unique_pages,
            outcome.urls_discovered,
            start_time.elapsed()
        );

        Ok(outcome)
    }
}

/// True if the Ctrl-C listener fired; a listener that failed to register
/// is logged and the crawl carries on without it
fn interrupt_requested(result: std::io::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Could not listen for Ctrl-C, continuing without it: {}", e);
            false
        }
    }
}

/// Runs a complete crawl
///
/// # Example
///
/// ```no_run
/// use anteater::config::load_config;
/// use anteater::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("anteater.toml"))?;
/// let outcome = run_crawl(config).await?;
/// println!("{} unique pages", outcome.unique_pages);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, AnteaterError> {
    let mut coordinator = Coordinator::new(config).await?;
    coordinator.run().await
}
