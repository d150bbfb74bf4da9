use crate::config::StopwordConfig;
use crate::AnteaterError;
use reqwest::Client;
use std::collections::HashSet;

const BUNDLED: &str = include_str!("../../data/stopwords.txt");

/// Words left out of frequency counts
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// An empty set; nothing is filtered
    pub fn empty() -> Self {
        Self::default()
    }

    /// The list shipped with the crate
    pub fn bundled() -> Self {
        let mut stopwords = Self::empty();
        stopwords.extend(parse_word_list(BUNDLED));
        stopwords
    }

    /// Bundled list plus the `extra` words from configuration
    pub fn from_config(config: &StopwordConfig) -> Self {
        let mut stopwords = Self::bundled();
        stopwords.extend(config.extra.iter().cloned());
        stopwords
    }

    /// Adds words, lowercased
    pub fn extend<I>(&mut self, words: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.trim().to_lowercase()).filter(|w| !w.is_empty()));
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Parses a word list: whitespace separated, `#` starts a comment line
fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

/// Downloads a supplementary word list
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Words from the response body
/// * `Err(AnteaterError)` - Request failed or returned a non-success status
pub async fn fetch_supplementary(client: &Client, url: &str) -> Result<Vec<String>, AnteaterError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| AnteaterError::Http {
            url: url.to_string(),
            source,
        })?;

    let body = response.text().await.map_err(|source| AnteaterError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(parse_word_list(&body))
}

/// Builds the stopword set for a crawl
///
/// The bundled list and configured extras are always present. A configured
/// supplementary URL is fetched once; if that fails the crawl continues
/// with what it has.
pub async fn load_stopwords(config: &StopwordConfig, client: &Client) -> StopWords {
    let mut stopwords = StopWords::from_config(config);

    if let Some(url) = config.supplementary_url.as_deref().filter(|u| !u.is_empty()) {
        match fetch_supplementary(client, url).await {
            Ok(words) => {
                tracing::info!("Loaded {} supplementary stopwords from {}", words.len(), url);
                stopwords.extend(words);
            }
            Err(e) => {
                tracing::warn!("Ignoring supplementary stopword list: {}", e);
            }
        }
    }

    stopwords
}
