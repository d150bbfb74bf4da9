//! URL handling module for Anteater
//!
//! This module provides fragment-free canonical URLs, host extraction,
//! domain scope matching and the trap classifier that decides which
//! discovered links are worth crawling.

mod classifier;
mod domain;
mod matcher;
mod normalize;

// Re-export main types and functions
pub use classifier::{HostRule, TrapClassifier, TrapRule, Verdict};
pub use domain::extract_domain;
pub use matcher::is_within_domain;
pub use normalize::{normalize, CanonicalUrl};
