/// Checks whether a host falls under a domain
///
/// A host is within `domain` when it is the domain itself or any subdomain of
/// it. Both arguments are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use anteater::url::is_within_domain;
///
/// assert!(is_within_domain("ics.uci.edu", "ics.uci.edu"));
/// assert!(is_within_domain("ics.uci.edu", "www.ics.uci.edu"));
/// assert!(is_within_domain("ics.uci.edu", "vision.ics.uci.edu"));
/// assert!(!is_within_domain("ics.uci.edu", "physics.uci.edu"));
/// ```
pub fn is_within_domain(domain: &str, host: &str) -> bool {
    if domain.is_empty() || host.is_empty() {
        return false;
    }

    match host.strip_suffix(domain) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}
