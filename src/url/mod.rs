//! URL handling module for Doc-Harvest
//!
//! This module provides URL normalization, validity and same-domain checks,
//! include/exclude pattern matching, and the classification of discovered
//! links into enqueue verdicts.

mod domain;
mod matcher;
mod normalize;

use crate::config::CrawlerConfig;
use crate::{ConfigError, UrlError};
use regex::Regex;

// Re-export main functions
pub use domain::{is_same_domain, is_valid_url};
pub use matcher::{compile_patterns, matches_any_pattern};
pub use normalize::normalize_url;

pub use ::url::Url;

/// Href prefixes that never point at a crawlable page
const SKIPPED_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:", "data:"];

/// Outcome of classifying a discovered link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkVerdict {
    /// Same-domain, valid, and passes the filters
    Follow(Url),
    /// Unparseable, non-HTTP(S), or a page-local/pseudo link
    Invalid,
    /// Points at another host
    CrossDomain,
    /// Include patterns are set and none matched
    NotIncluded(Url),
    /// Matched an exclude pattern
    Excluded(Url),
}

impl LinkVerdict {
    /// Returns true if the link should be enqueued
    pub fn should_follow(&self) -> bool {
        matches!(self, Self::Follow(_))
    }

    /// Returns true if the link was dropped by include/exclude patterns
    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::NotIncluded(_) | Self::Excluded(_))
    }

    /// Returns true if the link can never be crawled from this page
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Invalid | Self::CrossDomain)
    }

    /// The resolved same-domain URL, if the link got that far
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Follow(url) | Self::NotIncluded(url) | Self::Excluded(url) => Some(url),
            Self::Invalid | Self::CrossDomain => None,
        }
    }
}

/// Compiled include/exclude patterns for one crawl
#[derive(Debug, Clone, Default)]
pub struct LinkFilters {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl LinkFilters {
    /// Compiles the crawler's include and exclude pattern lists
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile_patterns(&config.include_patterns)?,
            exclude: compile_patterns(&config.exclude_patterns)?,
        })
    }

    /// Applies the filters to an absolute URL
    ///
    /// Exclusion wins over inclusion.
    pub fn verdict(&self, url: Url) -> LinkVerdict {
        if !self.include.is_empty() && !matches_any_pattern(url.as_str(), &self.include) {
            return LinkVerdict::NotIncluded(url);
        }
        if matches_any_pattern(url.as_str(), &self.exclude) {
            return LinkVerdict::Excluded(url);
        }
        LinkVerdict::Follow(url)
    }
}

/// Classifies a discovered href relative to the page it was found on
///
/// # Priority
///
/// 1. Invalid (pseudo link, unparseable, non-HTTP(S))
/// 2. Cross-domain
/// 3. Not included / excluded by the filters
/// 4. Follow
///
/// # Examples
///
/// ```
/// use doc_harvest::url::{classify_link, LinkFilters, LinkVerdict, Url};
///
/// let base = Url::parse("https://docs.example.com/guide/").unwrap();
/// let filters = LinkFilters::default();
///
/// assert!(classify_link("setup", &base, &filters).should_follow());
/// assert_eq!(
///     classify_link("https://other.org/", &base, &filters),
///     LinkVerdict::CrossDomain
/// );
/// assert_eq!(classify_link("mailto:x@y.z", &base, &filters), LinkVerdict::Invalid);
/// ```
pub fn classify_link(href: &str, base: &Url, filters: &LinkFilters) -> LinkVerdict {
    classify_link_within(href, base, base, filters)
}

/// Classifies a link resolved against `base` but held to the host of `origin`
///
/// After a redirect the page body came from `base` while the crawl is bound
/// to the host the page was requested from.
pub fn classify_link_within(
    href: &str,
    base: &Url,
    origin: &Url,
    filters: &LinkFilters,
) -> LinkVerdict {
    let trimmed = href.trim();
    if trimmed.is_empty() || SKIPPED_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return LinkVerdict::Invalid;
    }

    let url = match normalize_url(trimmed, Some(base)) {
        Ok(url) if is_valid_url(&url) => url,
        _ => return LinkVerdict::Invalid,
    };

    if !is_same_domain(&url, origin) {
        return LinkVerdict::CrossDomain;
    }

    filters.verdict(url)
}

/// Parses and checks a seed URL before a crawl starts
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let url = normalize_url(seed, None)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if !is_valid_url(&url) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://docs.example.com/guide/intro").unwrap()
    }

    fn filters(include: &[&str], exclude: &[&str]) -> LinkFilters {
        let config = CrawlerConfig {
            include_patterns: include.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: exclude.iter().map(|s| s.to_string()).collect(),
            ..CrawlerConfig::default()
        };
        LinkFilters::from_config(&config).unwrap()
    }

    #[test]
    fn test_follow_relative_same_domain() {
        let verdict = classify_link("../api#x", &base(), &LinkFilters::default());
        assert_eq!(
            verdict,
            LinkVerdict::Follow(Url::parse("https://docs.example.com/api").unwrap())
        );
    }

    #[test]
    fn test_pseudo_links_are_invalid() {
        let f = LinkFilters::default();
        for href in ["#top", "javascript:void(0)", "mailto:a@b.c", "tel:+123", "data:x", ""] {
            assert_eq!(classify_link(href, &base(), &f), LinkVerdict::Invalid, "{}", href);
        }
    }

    #[test]
    fn test_non_http_is_invalid() {
        let verdict = classify_link("ftp://docs.example.com/f", &base(), &LinkFilters::default());
        assert_eq!(verdict, LinkVerdict::Invalid);
    }

    #[test]
    fn test_cross_domain() {
        let verdict = classify_link("https://example.com/", &base(), &LinkFilters::default());
        assert_eq!(verdict, LinkVerdict::CrossDomain);
        assert!(verdict.is_rejected());
    }

    #[test]
    fn test_origin_host_bounds_the_crawl() {
        let origin = base();
        let landed = Url::parse("https://cdn.example.net/guide/").unwrap();
        let f = LinkFilters::default();

        assert_eq!(
            classify_link_within("setup", &landed, &origin, &f),
            LinkVerdict::CrossDomain
        );
        assert_eq!(
            classify_link_within("https://docs.example.com/api", &landed, &origin, &f),
            LinkVerdict::Follow(Url::parse("https://docs.example.com/api").unwrap())
        );
    }

    #[test]
    fn test_include_filter() {
        let f = filters(&["/docs/"], &[]);
        let base = Url::parse("https://example.com/").unwrap();
        assert!(classify_link("/docs/a", &base, &f).should_follow());
        let verdict = classify_link("/blog/b", &base, &f);
        assert!(matches!(verdict, LinkVerdict::NotIncluded(_)));
        assert_eq!(
            verdict.url().map(Url::as_str),
            Some("https://example.com/blog/b")
        );
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filters(&["/docs/"], &["/docs/internal"]);
        let base = Url::parse("https://example.com/").unwrap();
        assert!(classify_link("/docs/a", &base, &f).should_follow());
        let verdict = classify_link("/docs/internal/x", &base, &f);
        assert!(matches!(verdict, LinkVerdict::Excluded(_)));
        assert!(verdict.is_filtered());
    }

    #[test]
    fn test_parse_seed() {
        assert!(parse_seed("https://docs.example.com/#intro").is_ok());
        assert!(matches!(
            parse_seed("ftp://docs.example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(parse_seed("docs.example.com"), Err(UrlError::Parse(_))));
    }
}
