use crate::text::stopwords::StopWords;

/// Splits text into lowercase ASCII alphanumeric tokens, minus stopwords
///
/// A token is a maximal run of ASCII letters and digits; everything else
/// (punctuation, whitespace, non-ASCII letters) separates tokens.
///
/// # Examples
///
/// ```
/// use anteater::text::{tokenize, StopWords};
///
/// let stopwords = StopWords::bundled();
/// let tokens = tokenize("The ICS-33 course, in Python!", &stopwords);
/// assert_eq!(tokens, vec!["ics", "33", "course", "python"]);
/// ```
pub fn tokenize(text: &str, stopwords: &StopWords) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|run| !run.is_empty())
        .map(|run| run.to_ascii_lowercase())
        .filter(|token| !stopwords.contains(token))
        .collect()
}
