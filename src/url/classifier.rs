//! Crawl admission rules
//!
//! The classifier is an ordered table of [`TrapRule`]s. A URL is crawlable
//! only if no rule rejects it; evaluation stops at the first rejection.
//! The table is built from configuration, so new trap patterns are added
//! by editing the config file rather than this module.

use crate::config::{Config, HostRuleConfig};
use crate::url::matcher::is_within_domain;
use crate::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Outcome of classifying a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every rule passed
    Crawl,
    /// The named rule rejected the URL
    Reject(&'static str),
    /// The string could not be parsed as a URL
    Malformed,
}

impl Verdict {
    pub fn is_crawlable(&self) -> bool {
        matches!(self, Verdict::Crawl)
    }
}

/// The pieces of a URL the rules look at, extracted once per URL
struct UrlParts<'a> {
    scheme: &'a str,
    host: String,
    path: &'a str,
    query: &'a str,
}

/// A host-scoped trap (for example wiki media pages)
#[derive(Debug, Clone)]
pub struct HostRule {
    hosts: Vec<String>,
    path_contains: String,
    query_all: Vec<String>,
    query_any: Vec<String>,
}

impl HostRule {
    fn from_config(config: &HostRuleConfig) -> Self {
        Self {
            hosts: lowercase_all(&config.hosts),
            path_contains: config.path_contains.to_lowercase(),
            query_all: lowercase_all(&config.query_all),
            query_any: lowercase_all(&config.query_any),
        }
    }

    fn matches(&self, host: &str, path: &str, query: &str) -> bool {
        let path = path.to_lowercase();
        let query = query.to_lowercase();

        self.hosts.iter().any(|h| h == host)
            && path.contains(&self.path_contains)
            && self.query_all.iter().all(|q| query.contains(q.as_str()))
            && (self.query_any.is_empty() || self.query_any.iter().any(|q| query.contains(q.as_str())))
    }
}

/// One admission rule
#[derive(Debug, Clone)]
pub enum TrapRule {
    /// Only these schemes are fetched
    Scheme(Vec<String>),
    /// Host must be one of these domains or a subdomain of one
    AllowedDomains(Vec<String>),
    /// Traps that only exist on particular hosts
    HostRules(Vec<HostRule>),
    /// Case-insensitive markers anywhere in `path?query`
    Markers(Vec<String>),
    /// Markers anywhere in the host
    HostMarkers(Vec<String>),
    /// Regexes searched for in the path
    PathPatterns(Vec<Regex>),
    /// Regexes matched against each `&`-separated query parameter
    QueryPatterns(Vec<Regex>),
    /// Upper bounds on query length and parameter count
    QueryComplexity {
        max_length: usize,
        max_ampersands: usize,
    },
    /// Path extensions of non-HTML resources
    Extensions(HashSet<String>),
}

impl TrapRule {
    /// Short name used in logs and verdicts
    pub fn name(&self) -> &'static str {
        match self {
            TrapRule::Scheme(_) => "scheme",
            TrapRule::AllowedDomains(_) => "domain",
            TrapRule::HostRules(_) => "host-rule",
            TrapRule::Markers(_) => "trap-marker",
            TrapRule::HostMarkers(_) => "host-marker",
            TrapRule::PathPatterns(_) => "date-path",
            TrapRule::QueryPatterns(_) => "query-marker",
            TrapRule::QueryComplexity { .. } => "query-complexity",
            TrapRule::Extensions(_) => "extension",
        }
    }

    fn rejects(&self, parts: &UrlParts<'_>) -> bool {
        match self {
            TrapRule::Scheme(schemes) => !schemes.iter().any(|s| s == parts.scheme),

            TrapRule::AllowedDomains(domains) => !domains
                .iter()
                .any(|domain| is_within_domain(domain, &parts.host)),

            TrapRule::HostRules(rules) => rules
                .iter()
                .any(|rule| rule.matches(&parts.host, parts.path, parts.query)),

            TrapRule::Markers(markers) => {
                let haystack = if parts.query.is_empty() {
                    parts.path.to_lowercase()
                } else {
                    format!("{}?{}", parts.path, parts.query).to_lowercase()
                };
                markers.iter().any(|m| haystack.contains(m.as_str()))
            }

            TrapRule::HostMarkers(markers) => markers.iter().any(|m| parts.host.contains(m.as_str())),

            TrapRule::PathPatterns(patterns) => patterns.iter().any(|re| re.is_match(parts.path)),

            TrapRule::QueryPatterns(patterns) => parts
                .query
                .split('&')
                .any(|param| patterns.iter().any(|re| re.is_match(param))),

            TrapRule::QueryComplexity {
                max_length,
                max_ampersands,
            } => {
                parts.query.len() > *max_length
                    || parts.query.matches('&').count() > *max_ampersands
            }

            TrapRule::Extensions(extensions) => path_extension(parts.path)
                .map(|ext| extensions.contains(&ext))
                .unwrap_or(false),
        }
    }
}

/// Decides whether a URL is eligible for crawling
#[derive(Debug, Clone)]
pub struct TrapClassifier {
    rules: Vec<TrapRule>,
}

impl TrapClassifier {
    /// Creates a classifier from an explicit rule table
    pub fn new(rules: Vec<TrapRule>) -> Self {
        Self { rules }
    }

    /// Builds the standard rule table from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(TrapClassifier)` - Rules in evaluation order
    /// * `Err(ConfigError)` - A configured regex did not compile
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let traps = &config.traps;
        let limits = &config.limits;

        let rules = vec![
            TrapRule::Scheme(vec!["http".to_string(), "https".to_string()]),
            TrapRule::AllowedDomains(lowercase_all(&config.scope.allowed_domains)),
            TrapRule::HostRules(traps.host_rules.iter().map(HostRule::from_config).collect()),
            TrapRule::Markers(lowercase_all(&traps.substrings)),
            TrapRule::HostMarkers(lowercase_all(&traps.host_markers)),
            TrapRule::PathPatterns(compile_all(&traps.date_patterns)?),
            TrapRule::QueryPatterns(compile_all(&traps.query_patterns)?),
            TrapRule::QueryComplexity {
                max_length: limits.max_query_length,
                max_ampersands: limits.max_query_ampersands,
            },
            TrapRule::Extensions(lowercase_all(&traps.extensions).into_iter().collect()),
        ];

        Ok(Self::new(rules))
    }

    /// The rule table, in evaluation order
    pub fn rules(&self) -> &[TrapRule] {
        &self.rules
    }

    /// Runs the rule table and reports which rule, if any, rejected the URL
    pub fn verdict(&self, url: &str) -> Verdict {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Rejecting unparseable URL {:?}: {}", url, e);
                return Verdict::Malformed;
            }
        };

        let parts = UrlParts {
            scheme: parsed.scheme(),
            host: parsed.host_str().unwrap_or_default().to_lowercase(),
            path: parsed.path(),
            query: parsed.query().unwrap_or_default(),
        };

        for rule in &self.rules {
            if rule.rejects(&parts) {
                return Verdict::Reject(rule.name());
            }
        }

        Verdict::Crawl
    }

    /// Returns true if the URL should be handed to the frontier
    ///
    /// Never fails: anything that does not parse is simply rejected.
    pub fn is_valid(&self, url: &str) -> bool {
        match self.verdict(url) {
            Verdict::Crawl => true,
            Verdict::Reject(rule) => {
                tracing::trace!("Rejected {} ({})", url, rule);
                false
            }
            Verdict::Malformed => false,
        }
    }
}

/// Lowercased extension of the last path segment, if it has one
fn path_extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e))))
        .collect()
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}
