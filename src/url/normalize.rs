use crate::url::domain::extract_domain;
use crate::UrlError;
use std::fmt;
use url::Url;

/// A URL with its fragment removed
///
/// This is the key the analytics deduplicate on: two URLs that differ only
/// in their fragment are the same page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Parses an absolute URL and strips its fragment
    ///
    /// # Examples
    ///
    /// ```
    /// use anteater::url::CanonicalUrl;
    ///
    /// let url = CanonicalUrl::parse("https://www.ics.uci.edu/about#staff").unwrap();
    /// assert_eq!(url.as_str(), "https://www.ics.uci.edu/about");
    /// ```
    pub fn parse(url_str: &str) -> Result<Self, UrlError> {
        let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Ok(Self::from_url(url))
    }

    /// Resolves `href` against `base` and strips the fragment
    ///
    /// Resolution follows the WHATWG URL rules: scheme and host are inherited
    /// from the base, `.` and `..` segments are collapsed and the query is
    /// kept. An absolute `href` replaces the base entirely.
    ///
    /// # Examples
    ///
    /// ```
    /// use anteater::url::CanonicalUrl;
    ///
    /// let base = CanonicalUrl::parse("https://www.ics.uci.edu/a/b/c.html").unwrap();
    /// let url = CanonicalUrl::resolve(&base, "../d.html?x=1#top").unwrap();
    /// assert_eq!(url.as_str(), "https://www.ics.uci.edu/a/d.html?x=1");
    /// ```
    pub fn resolve(base: &CanonicalUrl, href: &str) -> Result<Self, UrlError> {
        let url = base
            .0
            .join(href.trim())
            .map_err(|e| UrlError::Parse(format!("{} (base {}): {}", href, base, e)))?;
        Ok(Self::from_url(url))
    }

    fn from_url(mut url: Url) -> Self {
        url.set_fragment(None);
        Self(url)
    }

    /// Lowercase host, if the URL has one
    pub fn host(&self) -> Option<String> {
        extract_domain(&self.0)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_string(self) -> String {
        self.0.into()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Resolves `href` against a base URL string and strips the fragment
///
/// Convenience wrapper over [`CanonicalUrl::resolve`] for callers holding
/// plain strings.
pub fn normalize(base: &str, href: &str) -> Result<CanonicalUrl, UrlError> {
    let base = CanonicalUrl::parse(base)?;
    CanonicalUrl::resolve(&base, href)
}
