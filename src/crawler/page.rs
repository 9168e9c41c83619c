//! Turns a fetched HTML body into a page result
//!
//! Parsing is synchronous: `scraper::Html` is not `Send`, so the parsed
//! document is created and dropped inside [`build_page`] and never held
//! across an await point.

use crate::config::RagConfig;
use crate::extract::{extract_metadata, extract_title};
use crate::output::PageResult;
use crate::profile::ProfileRegistry;
use crate::rag::chunk_content;
use crate::url::{classify_link_within, is_same_domain, LinkFilters, LinkVerdict};
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// A page result plus the links it contributes to the crawl
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub result: PageResult,

    /// Links that passed every check, in document order
    pub follow: Vec<Url>,

    /// Links dropped by include/exclude patterns
    pub filtered: usize,

    /// Links that were invalid or cross-domain
    pub rejected: usize,
}

/// Inputs shared by every page of a crawl
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub registry: &'a ProfileRegistry,
    pub rag: &'a RagConfig,
    pub filters: &'a LinkFilters,
}

/// Parses an HTML body and extracts everything a page result needs
///
/// # Link Extraction Rules
///
/// - Only `<a href>` elements are considered
/// - Anchors with a `download` attribute are skipped
/// - Relative links resolve against `final_url`, the URL after redirects
/// - Same-domain means the host of `url`, the URL the page was requested as
/// - A page that redirected to another host contributes no links; each of
///   its anchors counts as rejected
/// - `links` lists every valid same-domain link once, including those the
///   filters drop; `follow` holds only the links that passed the filters
///
/// # Arguments
///
/// * `body` - The fetched HTML
/// * `url` - The normalized URL the page was requested as
/// * `final_url` - The URL the response came from
/// * `depth` - Link distance of the page from the seed
/// * `ctx` - Registry, chunking config, and link filters
pub fn build_page(
    body: &str,
    url: &Url,
    final_url: &Url,
    depth: u32,
    ctx: PageContext<'_>,
) -> ParsedPage {
    let page = Html::parse_document(body);

    let profile = ctx.registry.detect(url, Some(&page));
    let title = extract_title(&page).unwrap_or_default();
    let content_html = profile
        .extract_content(&page)
        .map(|node| node.html)
        .unwrap_or_default();
    let navigation_html = profile
        .extract_navigation(&page)
        .map(|node| node.html)
        .unwrap_or_default();
    let metadata = extract_metadata(&page, url);

    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let mut follow = Vec::new();
    let mut filtered = 0;
    let mut rejected = 0;

    let mut hrefs = anchor_hrefs(&page);
    if !is_same_domain(final_url, url) {
        debug!(
            "Not following links of {}: redirected off-site to {}",
            url, final_url
        );
        rejected = hrefs.len();
        hrefs.clear();
    }

    for href in hrefs {
        let verdict = classify_link_within(href, final_url, url, ctx.filters);

        if let Some(link) = verdict.url() {
            if !seen.insert(link.as_str().to_string()) {
                continue;
            }
            links.push(link.to_string());
        }

        match verdict {
            LinkVerdict::Follow(link) => follow.push(link),
            LinkVerdict::NotIncluded(link) => {
                debug!("Not following {}: no include pattern matched", link);
                filtered += 1;
            }
            LinkVerdict::Excluded(link) => {
                debug!("Not following {}: matched an exclude pattern", link);
                filtered += 1;
            }
            LinkVerdict::CrossDomain => {
                debug!("Not following {}: different host", href);
                rejected += 1;
            }
            LinkVerdict::Invalid => {
                debug!("Not following {:?}: invalid link", href);
                rejected += 1;
            }
        }
    }

    let rag_content = ctx.rag.enabled.then(|| {
        chunk_content(&content_html, url.as_str(), metadata.clone(), ctx.rag)
    });

    ParsedPage {
        result: PageResult {
            url: url.to_string(),
            title,
            content_html,
            navigation_html,
            profile: profile.name().to_string(),
            depth,
            links,
            rag_content,
            metadata,
        },
        follow,
        filtered,
        rejected,
    }
}

fn anchor_hrefs(page: &Html) -> Vec<&str> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    page.select(&selector)
        .filter(|a| a.value().attr("download").is_none())
        .filter_map(|a| a.value().attr("href"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;

    const PAGE: &str = r##"<html>
<head><title>Guide</title><meta name="description" content="How to"></head>
<body>
  <nav><a href="/a">A</a><a href="/b">B</a><a href="/c">C</a><a href="/d">D</a></nav>
  <main>
    <h1>Intro</h1>
    <p>Hello <a href="/a">again</a>.</p>
    <a href="https://elsewhere.org/">out</a>
    <a href="mailto:x@y.z">mail</a>
    <a href="/private/x">private</a>
    <a href="/file.zip" download>zip</a>
    <a href="#top">top</a>
  </main>
</body>
</html>"##;

    fn run(body: &str, filters: &LinkFilters, rag: &RagConfig) -> ParsedPage {
        let registry = ProfileRegistry::new();
        let url = Url::parse("https://docs.example.com/guide/").unwrap();
        let ctx = PageContext {
            registry: &registry,
            rag,
            filters,
        };
        build_page(body, &url, &url, 1, ctx)
    }

    fn excluding_private() -> LinkFilters {
        let config = CrawlerConfig {
            exclude_patterns: vec!["/private/".to_string()],
            ..CrawlerConfig::default()
        };
        LinkFilters::from_config(&config).unwrap()
    }

    #[test]
    fn test_page_fields() {
        let parsed = run(PAGE, &LinkFilters::default(), &RagConfig::default());
        let page = &parsed.result;

        assert_eq!(page.url, "https://docs.example.com/guide/");
        assert_eq!(page.title, "Guide");
        assert_eq!(page.profile, "generic");
        assert_eq!(page.depth, 1);
        assert!(page.content_html.starts_with("<main>"));
        assert!(page.navigation_html.starts_with("<nav>"));
        assert_eq!(page.metadata["description"], "How to");
    }

    #[test]
    fn test_links_deduplicated_in_document_order() {
        let parsed = run(PAGE, &LinkFilters::default(), &RagConfig::default());

        assert_eq!(
            parsed.result.links,
            vec![
                "https://docs.example.com/a",
                "https://docs.example.com/b",
                "https://docs.example.com/c",
                "https://docs.example.com/d",
                "https://docs.example.com/private/x",
            ]
        );
        assert_eq!(parsed.follow.len(), 5);
        // cross-domain, mailto, fragment-only
        assert_eq!(parsed.rejected, 3);
        assert_eq!(parsed.filtered, 0);
    }

    #[test]
    fn test_filtered_links_are_listed_but_not_followed() {
        let parsed = run(PAGE, &excluding_private(), &RagConfig::default());

        assert!(parsed
            .result
            .links
            .contains(&"https://docs.example.com/private/x".to_string()));
        assert!(parsed.follow.iter().all(|u| !u.path().starts_with("/private")));
        assert_eq!(parsed.filtered, 1);
    }

    #[test]
    fn test_links_resolve_against_final_url() {
        let registry = ProfileRegistry::new();
        let rag = RagConfig::default();
        let filters = LinkFilters::default();
        let ctx = PageContext {
            registry: &registry,
            rag: &rag,
            filters: &filters,
        };
        let url = Url::parse("https://docs.example.com/old").unwrap();
        let final_url = Url::parse("https://docs.example.com/new/index.html").unwrap();

        let parsed = build_page(r#"<a href="next.html">n</a>"#, &url, &final_url, 0, ctx);

        assert_eq!(parsed.result.url, "https://docs.example.com/old");
        assert_eq!(
            parsed.result.links,
            vec!["https://docs.example.com/new/next.html"]
        );
    }

    #[test]
    fn test_off_site_redirect_contributes_no_links() {
        let registry = ProfileRegistry::new();
        let rag = RagConfig::default();
        let filters = LinkFilters::default();
        let ctx = PageContext {
            registry: &registry,
            rag: &rag,
            filters: &filters,
        };
        let url = Url::parse("https://docs.example.com/out").unwrap();
        let final_url = Url::parse("https://elsewhere.example.org/landing").unwrap();

        let parsed = build_page(
            r#"<a href="/secret">s</a><a href="https://docs.example.com/a">a</a>"#,
            &url,
            &final_url,
            1,
            ctx,
        );

        assert_eq!(parsed.result.url, "https://docs.example.com/out");
        assert!(parsed.result.links.is_empty());
        assert!(parsed.follow.is_empty());
        assert_eq!(parsed.rejected, 2);
    }

    #[test]
    fn test_rag_toggle() {
        let enabled = run(PAGE, &LinkFilters::default(), &RagConfig::default());
        let rag = enabled.result.rag_content.unwrap();
        assert!(!rag.chunks.is_empty());
        assert_eq!(rag.metadata["title"], "Guide");

        let disabled = RagConfig {
            enabled: false,
            ..RagConfig::default()
        };
        let parsed = run(PAGE, &LinkFilters::default(), &disabled);
        assert!(parsed.result.rag_content.is_none());
    }

    #[test]
    fn test_empty_body() {
        let parsed = run("", &LinkFilters::default(), &RagConfig::default());
        assert_eq!(parsed.result.title, "");
        assert!(parsed.result.links.is_empty());
        assert_eq!(parsed.result.navigation_html, "");
    }
}
