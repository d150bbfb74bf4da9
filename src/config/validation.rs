use crate::config::types::{
    Config, CrawlerConfig, LimitsConfig, OutputConfig, ScopeConfig, StopwordConfig, TrapConfig,
    UserAgentConfig,
};
use crate::url::is_within_domain;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scope_config(&config.scope)?;
    validate_crawler_config(&config.crawler, &config.scope)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_trap_config(&config.traps)?;
    validate_limits_config(&config.limits)?;
    validate_stopword_config(&config.stopwords)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl scope
fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed-domains cannot be empty".to_string(),
        ));
    }

    for domain in &config.allowed_domains {
        validate_domain_string(domain)?;
    }

    validate_domain_string(&config.analytics_domain)
}

/// Validates crawl driver configuration
fn validate_crawler_config(config: &CrawlerConfig, scope: &ScopeConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTP or HTTPS",
                seed
            )));
        }

        let host = url.host_str().unwrap_or_default().to_lowercase();
        if !scope
            .allowed_domains
            .iter()
            .any(|domain| is_within_domain(&domain.to_lowercase(), &host))
        {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' is outside the allowed domains",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

/// Validates trap pattern lists
fn validate_trap_config(config: &TrapConfig) -> Result<(), ConfigError> {
    for pattern in config.date_patterns.iter().chain(&config.query_patterns) {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }

    for marker in config.substrings.iter().chain(&config.host_markers) {
        if marker.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "Trap markers cannot be empty".to_string(),
            ));
        }
    }

    for ext in &config.extensions {
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidPattern(format!(
                "Extension '{}' must be non-empty and alphanumeric (no leading dot)",
                ext
            )));
        }
    }

    for rule in &config.host_rules {
        if rule.hosts.is_empty() {
            return Err(ConfigError::Validation(
                "host-rules entries must list at least one host".to_string(),
            ));
        }
        for host in &rule.hosts {
            validate_domain_string(host)?;
        }
        if rule.query_all.is_empty() && rule.query_any.is_empty() && rule.path_contains.is_empty()
        {
            return Err(ConfigError::Validation(format!(
                "host rule for {:?} would reject every URL on those hosts",
                rule.hosts
            )));
        }
    }

    Ok(())
}

/// Validates numeric thresholds
fn validate_limits_config(config: &LimitsConfig) -> Result<(), ConfigError> {
    if config.snapshot_interval < 1 {
        return Err(ConfigError::Validation(
            "snapshot-interval must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates stopword sources
fn validate_stopword_config(config: &StopwordConfig) -> Result<(), ConfigError> {
    if let Some(url) = config.supplementary_url.as_deref().filter(|u| !u.is_empty()) {
        Url::parse(url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid supplementary-url '{}': {}", url, e))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.snapshot_path.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot-path cannot be empty".to_string(),
        ));
    }

    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report-path cannot be empty".to_string(),
        ));
    }

    if config.top_words < 1 {
        return Err(ConfigError::Validation("top-words must be >= 1".to_string()));
    }

    Ok(())
}

/// Validates a bare domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'uci.edu')",
            domain
        )));
    }

    Ok(())
}
