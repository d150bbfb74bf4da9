//! The boundary the frontier calls for every fetched page

use crate::analytics::Analytics;
use crate::config::Config;
use crate::crawler::fetcher::FetchResult;
use crate::crawler::processor::PageProcessor;
use crate::text::StopWords;
use crate::url::TrapClassifier;
use crate::ConfigError;
use std::sync::Arc;

/// Page processing followed by crawl admission
pub struct Scraper {
    processor: PageProcessor,
    classifier: TrapClassifier,
}

impl Scraper {
    pub fn new(processor: PageProcessor, classifier: TrapClassifier) -> Self {
        Self {
            processor,
            classifier,
        }
    }

    /// Wires a processor and classifier from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to use
    /// * `Err(ConfigError)` - A trap pattern failed to compile
    pub fn from_config(
        config: &Config,
        stopwords: StopWords,
        analytics: Arc<Analytics>,
    ) -> Result<Self, ConfigError> {
        let processor = PageProcessor::new(Arc::new(stopwords), analytics, &config.limits);
        let classifier = TrapClassifier::from_config(config)?;
        Ok(Self::new(processor, classifier))
    }

    /// Returns the links from a fetched page that are worth crawling
    ///
    /// Output may repeat URLs returned for earlier pages; deduplicating the
    /// queue is the frontier's job.
    pub fn scrape(&self, base_url: &str, fetch: &FetchResult) -> Vec<String> {
        let links = self.processor.process(fetch);
        let total = links.len();

        let admitted: Vec<String> = links
            .into_iter()
            .filter(|link| self.classifier.is_valid(link))
            .collect();

        tracing::debug!("{}: {} of {} links admitted", base_url, admitted.len(), total);
        admitted
    }

    pub fn processor(&self) -> &PageProcessor {
        &self.processor
    }

    pub fn classifier(&self) -> &TrapClassifier {
        &self.classifier
    }
}
