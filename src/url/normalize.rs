use crate::UrlError;
use url::Url;

/// Normalizes a URL according to Doc-Harvest's normalization rules
///
/// # Normalization Steps
///
/// 1. Resolve `href` against `base` when a base is given, otherwise parse it
///    as an absolute URL; reject if malformed
/// 2. Remove fragment (everything after #)
///
/// Scheme, host case and path are left to the URL parser, which already
/// lowercases hosts and resolves dot segments. Normalization is idempotent.
///
/// # Arguments
///
/// * `href` - The URL string to normalize, absolute or relative
/// * `base` - Optional base URL to resolve relative references against
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse the URL
///
/// # Examples
///
/// ```
/// use doc_harvest::url::normalize_url;
/// use url::Url;
///
/// let url = normalize_url("https://docs.example.com/guide#install", None).unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/guide");
///
/// let base = Url::parse("https://docs.example.com/guide/intro").unwrap();
/// let url = normalize_url("../api", Some(&base)).unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/api");
/// ```
pub fn normalize_url(href: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let href = href.trim();

    let mut url = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    url.set_fragment(None);

    Ok(url)
}
