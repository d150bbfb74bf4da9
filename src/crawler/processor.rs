//! Page processing
//!
//! Takes one [`FetchResult`] and:
//! - rejects responses that are not a usable HTML page
//! - extracts the visible text and tokenizes it
//! - records the page in the shared [`Analytics`] (once per canonical URL)
//! - returns every outbound link, resolved and without fragments
//!
//! Nothing in here fails: a page that cannot be used yields no links.

use crate::analytics::Analytics;
use crate::config::LimitsConfig;
use crate::crawler::fetcher::{is_html, FetchResult};
use crate::text::{tokenize, StopWords};
use crate::url::CanonicalUrl;
use scraper::{Html, Node, Selector};
use std::sync::Arc;

/// Elements whose text never reaches the reader
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Link prefixes that do not lead to a document
const PSEUDO_LINK_PREFIXES: &[&str] = &["mailto:", "javascript:"];

/// Turns fetch results into analytics updates and candidate links
pub struct PageProcessor {
    stopwords: Arc<StopWords>,
    analytics: Arc<Analytics>,
    max_content_length: u64,
    min_text_length: usize,
}

impl PageProcessor {
    /// Creates a processor
    ///
    /// # Arguments
    ///
    /// * `stopwords` - Words excluded from frequency counts
    /// * `analytics` - Shared crawl aggregates
    /// * `limits` - `max-content-length` and `min-text-length` are used; 0 disables either
    pub fn new(stopwords: Arc<StopWords>, analytics: Arc<Analytics>, limits: &LimitsConfig) -> Self {
        Self {
            stopwords,
            analytics,
            max_content_length: limits.max_content_length,
            min_text_length: limits.min_text_length,
        }
    }

    pub fn analytics(&self) -> &Arc<Analytics> {
        &self.analytics
    }

    /// Processes one fetched page
    ///
    /// # Returns
    ///
    /// Absolute, fragment-free links in document order. Empty if the
    /// response was not a 200 HTML page, declared a body over the size cap,
    /// or carried too little text. Links are returned even when the page
    /// itself was seen before.
    pub fn process(&self, fetch: &FetchResult) -> Vec<String> {
        let body = match (&fetch.body, fetch.status) {
            (Some(body), 200) => body,
            _ => {
                tracing::debug!("Skipping {}: HTTP {} or no body", fetch.url, fetch.status);
                return Vec::new();
            }
        };

        if !is_html(fetch.content_type.as_deref()) {
            tracing::debug!(
                "Skipping {}: content type {:?} is not HTML",
                fetch.url,
                fetch.content_type
            );
            return Vec::new();
        }

        if let Some(length) = fetch.content_length {
            if self.max_content_length > 0 && length > self.max_content_length {
                tracing::debug!(
                    "Skipping {}: {} bytes exceeds {}",
                    fetch.url,
                    length,
                    self.max_content_length
                );
                return Vec::new();
            }
        }

        let html = String::from_utf8_lossy(body);
        if html.trim().is_empty() {
            tracing::debug!("Skipping {}: empty document", fetch.url);
            return Vec::new();
        }
        let document = Html::parse_document(&html);

        let text = extract_visible_text(&document);
        if self.min_text_length > 0 && text.chars().count() < self.min_text_length {
            tracing::debug!(
                "Skipping {}: only {} characters of text",
                fetch.url,
                text.chars().count()
            );
            return Vec::new();
        }

        let tokens = tokenize(&text, &self.stopwords);

        let page_url = if fetch.final_url.trim().is_empty() {
            &fetch.url
        } else {
            &fetch.final_url
        };
        let canonical = match CanonicalUrl::parse(page_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping page with unusable URL {:?}: {}", page_url, e);
                return Vec::new();
            }
        };

        if self.analytics.observe_page(&canonical, &tokens) {
            tracing::debug!("Recorded {} ({} tokens)", canonical, tokens.len());
        } else {
            tracing::debug!("Already counted {}", canonical);
        }

        extract_links(&document, &canonical)
    }
}

/// Joins every visible text node with single spaces
fn extract_visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| INVISIBLE_ELEMENTS.contains(&el.name()))
                .unwrap_or(false)
        });
        if !hidden {
            parts.push(text);
        }
    }

    parts.join(" ")
}

/// Extracts every followable `<a href>` as an absolute URL
fn extract_links(document: &Html, base_url: &CanonicalUrl) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves an href against the page URL
///
/// Returns None for empty hrefs, `mailto:`/`javascript:` links and hrefs
/// that do not resolve to a valid URL.
fn resolve_link(href: &str, base_url: &CanonicalUrl) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if PSEUDO_LINK_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }

    match CanonicalUrl::resolve(base_url, href) {
        Ok(url) => Some(url.into_string()),
        Err(e) => {
            tracing::trace!("Dropping link {:?}: {}", href, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsSnapshot, SnapshotSink};
    use crate::AnteaterError;

    struct NullSink;

    impl SnapshotSink for NullSink {
        fn write(&self, _snapshot: &AnalyticsSnapshot) -> Result<(), AnteaterError> {
            Ok(())
        }

        fn describe(&self) -> String {
            "null".to_string()
        }
    }

    fn processor_with(limits: LimitsConfig) -> PageProcessor {
        let analytics = Arc::new(Analytics::new(Box::new(NullSink), 25, "uci.edu"));
        PageProcessor::new(Arc::new(StopWords::bundled()), analytics, &limits)
    }

    fn lenient() -> PageProcessor {
        processor_with(LimitsConfig {
            min_text_length: 0,
            ..LimitsConfig::default()
        })
    }

    fn page(body: &str) -> FetchResult {
        FetchResult::html("https://www.ics.uci.edu/dir/index.html", body)
    }

    #[test]
    fn test_extracts_and_resolves_links() {
        let links = lenient().process(&page(
            r#"<html><body>
                <a href="/page2">abs</a>
                <a href="sibling.html#part">rel</a>
                <a href="https://www.stat.uci.edu/">other</a>
            </body></html>"#,
        ));

        assert_eq!(
            links,
            vec![
                "https://www.ics.uci.edu/page2",
                "https://www.ics.uci.edu/dir/sibling.html",
                "https://www.stat.uci.edu/",
            ]
        );
    }

    #[test]
    fn test_skips_pseudo_links() {
        let links = lenient().process(&page(
            r#"<a href="mailto:a@uci.edu">m</a>
               <a href="JavaScript:void(0)">j</a>
               <a href="   ">blank</a>
               <a href="">empty</a>
               <a name="anchor">no href</a>
               <a href="/kept">k</a>"#,
        ));
        assert_eq!(links, vec!["https://www.ics.uci.edu/kept"]);
    }

    #[test]
    fn test_fragment_only_link_points_at_page() {
        let links = lenient().process(&page(r##"<a href="#top">top</a>"##));
        assert_eq!(links, vec!["https://www.ics.uci.edu/dir/index.html"]);
    }

    #[test]
    fn test_links_resolve_against_final_url() {
        let mut fetch = page(r#"<a href="next">n</a>"#);
        fetch.final_url = "https://www.ics.uci.edu/moved/here.html#frag".to_string();

        let processor = lenient();
        let links = processor.process(&fetch);

        assert_eq!(links, vec!["https://www.ics.uci.edu/moved/next"]);
        assert_eq!(processor.analytics().unique_pages(), 1);
        assert_eq!(
            processor.analytics().snapshot().unique_urls,
            vec!["https://www.ics.uci.edu/moved/here.html"]
        );
    }

    #[test]
    fn test_empty_final_url_falls_back_to_request_url() {
        let mut fetch = page(r#"<a href="x">x</a>"#);
        fetch.final_url = String::new();
        assert_eq!(lenient().process(&fetch), vec!["https://www.ics.uci.edu/dir/x"]);
    }

    #[test]
    fn test_non_200_is_ignored() {
        let processor = lenient();
        let mut fetch = page(r#"<a href="/x">x</a>"#);
        fetch.status = 404;

        assert!(processor.process(&fetch).is_empty());
        assert_eq!(processor.analytics().unique_pages(), 0);
    }

    #[test]
    fn test_missing_body_is_ignored() {
        let fetch = FetchResult::failed("https://www.ics.uci.edu/", 200);
        assert!(lenient().process(&fetch).is_empty());
    }

    #[test]
    fn test_non_html_is_ignored() {
        let processor = lenient();
        let mut fetch = page(r#"<a href="/x">x</a>"#);
        fetch.content_type = Some("application/pdf".to_string());
        assert!(processor.process(&fetch).is_empty());

        fetch.content_type = None;
        assert!(processor.process(&fetch).is_empty());

        fetch.content_type = Some("TEXT/HTML; charset=ISO-8859-1".to_string());
        assert_eq!(processor.process(&fetch).len(), 1);
    }

    #[test]
    fn test_declared_size_cap() {
        let processor = lenient();
        let mut fetch = page(r#"<a href="/x">x</a>"#);

        fetch.content_length = Some(8_000_001);
        assert!(processor.process(&fetch).is_empty());

        fetch.content_length = Some(8_000_000);
        assert_eq!(processor.process(&fetch).len(), 1);

        let uncapped = processor_with(LimitsConfig {
            min_text_length: 0,
            max_content_length: 0,
            ..LimitsConfig::default()
        });
        fetch.content_length = Some(u64::MAX);
        assert_eq!(uncapped.process(&fetch).len(), 1);
    }

    #[test]
    fn test_short_pages_are_skipped() {
        let processor = processor_with(LimitsConfig::default());
        let short = page(r#"<p>Too short.</p><a href="/x">x</a>"#);

        assert!(processor.process(&short).is_empty());
        assert_eq!(processor.analytics().unique_pages(), 0);

        let long_text = "anteater ".repeat(40);
        let long = page(&format!(r#"<p>{}</p><a href="/x">x</a>"#, long_text));
        assert_eq!(processor.process(&long).len(), 1);
        assert_eq!(processor.analytics().word_count("anteater"), 40);
    }

    #[test]
    fn test_blank_body_is_skipped() {
        let processor = lenient();
        assert!(processor.process(&page("   \n ")).is_empty());
        assert_eq!(processor.analytics().unique_pages(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut body = b"<p>caf".to_vec();
        body.push(0xE9);
        body.extend_from_slice(b" irvine</p><a href=\"/ok\">ok</a>");
        let fetch = FetchResult::html("https://www.ics.uci.edu/", body);

        let processor = lenient();
        assert_eq!(processor.process(&fetch), vec!["https://www.ics.uci.edu/ok"]);
        assert_eq!(processor.analytics().word_count("irvine"), 1);
    }

    #[test]
    fn test_revisit_counts_once_but_returns_links() {
        let processor = lenient();
        let fetch = page(r#"<p>zot zot anteater</p><a href="/next">n</a>"#);

        let first = processor.process(&fetch);
        let second = processor.process(&fetch);

        assert_eq!(first, second);
        assert_eq!(processor.analytics().word_count("zot"), 2);
        assert_eq!(processor.analytics().subdomain_count("www.ics.uci.edu"), 1);
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let document = Html::parse_document(
            r#"<html><head><title>Home</title><style>p { color: red }</style>
               <script>var hidden = 1;</script></head>
               <body><p>Hello   <b>world</b></p><noscript>enable js</noscript></body></html>"#,
        );
        assert_eq!(extract_visible_text(&document), "Home Hello world");
    }

    #[test]
    fn test_stopwords_not_counted() {
        let processor = lenient();
        processor.process(&page("<p>The anteater and the zot</p>"));
        assert_eq!(processor.analytics().word_count("the"), 0);
        assert_eq!(processor.analytics().word_count("and"), 0);
        assert_eq!(processor.analytics().total_words(), 2);
    }
}
