use serde::Deserialize;

/// Main configuration structure for Anteater
///
/// Every section is optional; a missing section falls back to the defaults
/// used for the UCI crawl.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub traps: TrapConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub stopwords: StopwordConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl driver configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URLs the frontier starts from
    pub seeds: Vec<String>,

    /// Number of fetches allowed in flight at once
    pub workers: u32,

    /// Delay before each request (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Stop after this many fetches (0 means no cap)
    #[serde(rename = "max-pages")]
    pub max_pages: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seeds: vec![
                "https://www.ics.uci.edu".to_string(),
                "https://www.cs.uci.edu".to_string(),
                "https://www.informatics.uci.edu".to_string(),
                "https://www.stat.uci.edu".to_string(),
            ],
            workers: 1,
            request_delay_ms: 500,
            max_pages: 0,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "anteater".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://www.ics.uci.edu".to_string(),
        }
    }
}

/// Which hosts are in scope
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// A host is crawlable if it equals one of these or is a subdomain of one
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Pages under this domain family are counted per subdomain
    #[serde(rename = "analytics-domain")]
    pub analytics_domain: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            allowed_domains: to_strings(&[
                "ics.uci.edu",
                "cs.uci.edu",
                "informatics.uci.edu",
                "stat.uci.edu",
            ]),
            analytics_domain: "uci.edu".to_string(),
        }
    }
}

/// Trap patterns, evaluated by the classifier in a fixed order
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrapConfig {
    /// Case-insensitive markers matched against `path?query`
    pub substrings: Vec<String>,

    /// Markers matched against the host
    #[serde(rename = "host-markers")]
    pub host_markers: Vec<String>,

    /// Rules that only apply to particular hosts
    #[serde(rename = "host-rules")]
    pub host_rules: Vec<HostRuleConfig>,

    /// Regexes searched for in the path
    #[serde(rename = "date-patterns")]
    pub date_patterns: Vec<String>,

    /// Regexes matched against the query and each of its parameters
    #[serde(rename = "query-patterns")]
    pub query_patterns: Vec<String>,

    /// Path extensions that never hold an HTML document
    pub extensions: Vec<String>,
}

impl Default for TrapConfig {
    fn default() -> Self {
        let wiki_hosts = to_strings(&["wiki.ics.uci.edu", "swiki.ics.uci.edu"]);

        Self {
            substrings: to_strings(&[
                "/calendar",
                "/events",
                "/event",
                "/archives",
                "/archive",
                "/feed",
                "format=feed",
                "view=print",
                "print=1",
                "preview=",
                "share=",
                "replytocom=",
                "utm",
                "sessionid",
                "phpsessid",
            ]),
            host_markers: to_strings(&["calendar"]),
            host_rules: vec![
                HostRuleConfig {
                    hosts: wiki_hosts.clone(),
                    path_contains: "doku.php".to_string(),
                    query_all: Vec::new(),
                    query_any: to_strings(&["do=media", "do=export"]),
                },
                HostRuleConfig {
                    hosts: wiki_hosts,
                    path_contains: "doku.php".to_string(),
                    query_all: to_strings(&["image="]),
                    query_any: to_strings(&["tab_files=", "ns="]),
                },
            ],
            date_patterns: to_strings(&[r"\d{4}[-/]\d{2}[-/]\d{2}"]),
            query_patterns: to_strings(&[r"^(page|date|year|month)=\d{4,}"]),
            extensions: to_strings(&[
                "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid",
                "mp2", "mp3", "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg",
                "ogv", "pdf", "ps", "eps", "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx",
                "names", "data", "dat", "exe", "bz2", "tar", "msi", "bin", "7z", "psd", "dmg",
                "iso", "epub", "dll", "cnf", "tgz", "sha1", "thmx", "mso", "arff", "rtf", "jar",
                "csv", "rm", "smil", "wmv", "swf", "wma", "zip", "rar", "gz",
            ]),
        }
    }
}

/// A trap rule scoped to specific hosts
///
/// Matches when the host is listed, the path contains `path-contains`, the
/// query contains every entry of `query-all` and at least one entry of
/// `query-any` (an empty list is satisfied trivially).
#[derive(Debug, Clone, Deserialize)]
pub struct HostRuleConfig {
    pub hosts: Vec<String>,

    #[serde(rename = "path-contains", default)]
    pub path_contains: String,

    #[serde(rename = "query-all", default)]
    pub query_all: Vec<String>,

    #[serde(rename = "query-any", default)]
    pub query_any: Vec<String>,
}

/// Size and length thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Pages declaring a larger Content-Length are skipped (0 disables)
    #[serde(rename = "max-content-length")]
    pub max_content_length: u64,

    /// Pages with less visible text are skipped (0 disables)
    #[serde(rename = "min-text-length")]
    pub min_text_length: usize,

    /// Longest query string the classifier accepts
    #[serde(rename = "max-query-length")]
    pub max_query_length: usize,

    /// Most `&` characters the classifier accepts in a query
    #[serde(rename = "max-query-ampersands")]
    pub max_query_ampersands: usize,

    /// Write a snapshot every time this many new pages have been seen
    #[serde(rename = "snapshot-interval")]
    pub snapshot_interval: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_content_length: 8_000_000,
            min_text_length: 250,
            max_query_length: 120,
            max_query_ampersands: 6,
            snapshot_interval: 25,
        }
    }
}

/// Stopword sources layered on top of the bundled list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StopwordConfig {
    /// Additional words to exclude
    pub extra: Vec<String>,

    /// Plain-text word list fetched once at startup; failures are ignored
    #[serde(rename = "supplementary-url")]
    pub supplementary_url: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where analytics snapshots are written
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: String,

    /// Where the markdown report is written
    #[serde(rename = "report-path")]
    pub report_path: String,

    /// Number of most frequent words listed in reports
    #[serde(rename = "top-words")]
    pub top_words: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "analytics/stats.json".to_string(),
            report_path: "analytics/report.md".to_string(),
            top_words: 50,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
