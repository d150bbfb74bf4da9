//! Configuration module for Anteater
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every threshold and pattern list the crawler uses lives here so it can be
//! adjusted without touching code.
//!
//! # Example
//!
//! ```no_run
//! use anteater::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("anteater.toml")).unwrap();
//! println!("Snapshot every {} pages", config.limits.snapshot_interval);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HostRuleConfig, LimitsConfig, OutputConfig, ScopeConfig,
    StopwordConfig, TrapConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
