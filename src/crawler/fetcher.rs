//! HTTP fetcher implementation
//!
//! Turns a URL into a [`FetchResult`]. Network failures are folded into the
//! result (status 0, no body) so one bad host never stops the crawl; the
//! page processor treats them like any other non-200 response.

use crate::config::UserAgentConfig;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;

/// Status recorded when no HTTP response was received at all
pub const NO_RESPONSE: u16 = 0;

/// Everything the page processor needs from one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// URL that was requested
    pub url: String,

    /// HTTP status code, or [`NO_RESPONSE`]
    pub status: u16,

    /// Content-Type header value
    pub content_type: Option<String>,

    /// Declared Content-Length; `None` when missing or unparseable
    pub content_length: Option<u64>,

    /// Response body, if one was read
    pub body: Option<Vec<u8>>,

    /// URL after redirects
    pub final_url: String,
}

impl FetchResult {
    /// A 200 `text/html` response with no redirect
    pub fn html(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            content_length: None,
            body: Some(body.into()),
        }
    }

    /// A response without a body
    pub fn failed(url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            status,
            content_type: None,
            content_length: None,
            body: None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout_secs` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &UserAgentConfig, timeout_secs: u64) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL
///
/// Redirects are followed by the client; `final_url` records where they
/// ended. The body is only read for 200 `text/html` responses, and only up
/// to `max_content_length` bytes (`0` means no cap). A response that
/// declares or streams more than the cap comes back without a body.
pub async fn fetch_url(client: &Client, url: &str, max_content_length: u64) -> FetchResult {
    let mut response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Request to {} failed: {}", url, e);
            return FetchResult::failed(url, NO_RESPONSE);
        }
    };

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = header_value(response.headers(), CONTENT_TYPE);
    let content_length = parse_content_length(response.headers());

    if final_url != url {
        tracing::debug!("{} redirected to {}", url, final_url);
    }

    let over_cap = |length: u64| max_content_length > 0 && length > max_content_length;

    let body = if status != 200 {
        tracing::debug!("HTTP {} for {}", status, url);
        None
    } else if !is_html(content_type.as_deref()) {
        tracing::debug!(
            "Not reading {}: content type {:?} is not HTML",
            final_url,
            content_type
        );
        None
    } else if content_length.is_some_and(over_cap) {
        tracing::debug!(
            "Not reading {}: declared {} bytes exceeds {}",
            final_url,
            content_length.unwrap_or_default(),
            max_content_length
        );
        None
    } else {
        read_body(&mut response, &final_url, max_content_length).await
    };

    FetchResult {
        url: url.to_string(),
        status,
        content_type,
        content_length,
        body,
        final_url,
    }
}

/// Streams the body, giving up once it passes `max_content_length`
async fn read_body(response: &mut Response, url: &str, max_content_length: u64) -> Option<Vec<u8>> {
    let mut body = Vec::new();

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                body.extend_from_slice(&chunk);
                if max_content_length > 0 && body.len() as u64 > max_content_length {
                    tracing::debug!(
                        "Stopped reading {}: body exceeds {} bytes",
                        url,
                        max_content_length
                    );
                    return None;
                }
            }
            Ok(None) => return Some(body),
            Err(e) => {
                tracing::warn!("Failed to read body of {}: {}", url, e);
                return None;
            }
        }
    }
}

/// True for `text/html` content types, ignoring case and parameters
pub(crate) fn is_html(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Content-Length as a number; anything unparseable counts as unknown
fn parse_content_length(headers: &HeaderMap) -> Option<u64> {
    header_value(headers, CONTENT_LENGTH).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CAP: u64 = 8_000_000;

    fn test_client() -> Client {
        build_http_client(&UserAgentConfig::default(), 5).unwrap()
    }

    #[test]
    fn test_parse_content_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_content_length(&headers), None);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1234"));
        assert_eq!(parse_content_length(&headers), Some(1234));

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(parse_content_length(&headers), None);
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html><body>hi</body></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/", server.uri());
        let result = fetch_url(&test_client(), &url, CAP).await;

        assert_eq!(result.status, 200);
        assert!(result.content_type.unwrap().starts_with("text/html"));
        assert_eq!(result.body.as_deref(), Some(&b"<html><body>hi</body></html>"[..]));
        assert_eq!(result.final_url, url);
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("moved", "text/html"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/old", server.uri());
        let result = fetch_url(&test_client(), &url, CAP).await;

        assert_eq!(result.url, url);
        assert_eq!(result.final_url, format!("{}/new", server.uri()));
        assert_eq!(result.status, 200);
    }

    #[tokio::test]
    async fn test_fetch_404_has_no_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let result = fetch_url(&test_client(), &format!("{}/missing", server.uri()), CAP).await;

        assert_eq!(result.status, 404);
        assert!(result.body.is_none());
    }

    #[tokio::test]
    async fn test_fetch_network_error() {
        // Port 9 (discard) on localhost is almost never listening
        let result = fetch_url(&test_client(), "http://127.0.0.1:9/", CAP).await;
        assert_eq!(result.status, NO_RESPONSE);
        assert!(result.body.is_none());
    }

    #[tokio::test]
    async fn test_fetch_skips_body_over_declared_cap() {
        let server = MockServer::start().await;
        let body = format!("<html><body>{}</body></html>", "a".repeat(2_000));
        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.clone(), "text/html"))
            .mount(&server)
            .await;

        let url = format!("{}/big", server.uri());
        let capped = fetch_url(&test_client(), &url, 1_000).await;

        assert_eq!(capped.status, 200);
        assert_eq!(capped.content_length, Some(body.len() as u64));
        assert!(capped.body.is_none());

        let uncapped = fetch_url(&test_client(), &url, 0).await;
        assert_eq!(uncapped.body.map(|b| b.len()), Some(body.len()));
    }

    #[tokio::test]
    async fn test_fetch_skips_non_html_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/handbook"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0x25u8, 0x50, 0x44, 0x46], "application/pdf"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/handbook", server.uri());
        let result = fetch_url(&test_client(), &url, CAP).await;

        assert_eq!(result.status, 200);
        assert_eq!(result.content_type.as_deref(), Some("application/pdf"));
        assert!(result.body.is_none());
    }

    #[test]
    fn test_is_html() {
        assert!(is_html(Some("text/html")));
        assert!(is_html(Some("Text/HTML; charset=UTF-8")));
        assert!(!is_html(Some("application/pdf")));
        assert!(!is_html(None));
    }
}
