use crate::ConfigError;
use regex::Regex;

/// Checks whether a URL matches at least one pattern
///
/// Patterns are searched for anywhere in the URL (substring search, not a
/// full match). An empty pattern list never matches.
///
/// # Examples
///
/// ```
/// use doc_harvest::url::{compile_patterns, matches_any_pattern};
///
/// let patterns = compile_patterns(&["/docs/".to_string()]).unwrap();
/// assert!(matches_any_pattern("https://example.com/docs/intro", &patterns));
/// assert!(!matches_any_pattern("https://example.com/blog/post", &patterns));
/// assert!(!matches_any_pattern("https://example.com/docs/intro", &[]));
/// ```
pub fn matches_any_pattern(url: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(url))
}

/// Compiles a list of regex sources
///
/// Fails on the first pattern that is not a valid regular expression.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}
