use url::Url;

/// Returns true if the URL can be crawled
///
/// A URL is valid when it has a non-empty host and its scheme is `http` or
/// `https`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_harvest::url::is_valid_url;
///
/// assert!(is_valid_url(&Url::parse("https://docs.example.com/").unwrap()));
/// assert!(!is_valid_url(&Url::parse("ftp://docs.example.com/").unwrap()));
/// assert!(!is_valid_url(&Url::parse("mailto:team@example.com").unwrap()));
/// ```
pub fn is_valid_url(url: &Url) -> bool {
    let has_host = url.host_str().map(|h| !h.is_empty()).unwrap_or(false);
    has_host && matches!(url.scheme(), "http" | "https")
}

/// Returns true if both URLs have byte-equal host components
///
/// Subdomains are not folded: `docs.example.com` and `example.com` are
/// different domains.
pub fn is_same_domain(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_valid_http_and_https() {
        assert!(is_valid_url(&url("http://example.com/")));
        assert!(is_valid_url(&url("https://example.com/page")));
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(!is_valid_url(&url("ftp://example.com/file")));
        assert!(!is_valid_url(&url("javascript:void(0)")));
        assert!(!is_valid_url(&url("data:text/html,hi")));
        assert!(!is_valid_url(&url("file:///etc/hosts")));
    }

    #[test]
    fn test_same_domain() {
        assert!(is_same_domain(
            &url("https://docs.example.com/a"),
            &url("https://docs.example.com/b?x=1")
        ));
    }

    #[test]
    fn test_same_domain_ignores_scheme() {
        assert!(is_same_domain(
            &url("http://docs.example.com/a"),
            &url("https://docs.example.com/a")
        ));
    }

    #[test]
    fn test_subdomains_are_different() {
        assert!(!is_same_domain(
            &url("https://docs.example.com/"),
            &url("https://example.com/")
        ));
        assert!(!is_same_domain(
            &url("https://www.example.com/"),
            &url("https://example.com/")
        ));
    }

    #[test]
    fn test_hostless_urls_never_match() {
        assert!(!is_same_domain(
            &url("mailto:a@example.com"),
            &url("mailto:a@example.com")
        ));
    }
}
