//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use doc_harvest::config::{parse_config, CrawlerConfig, RagConfig};
use doc_harvest::rag::ChunkKind;
use doc_harvest::{crawl, Crawler, CrawlError, CrawlResult, ProfileRegistry};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings tuned for fast tests
fn test_config() -> CrawlerConfig {
    CrawlerConfig {
        max_depth: 3,
        delay_ms: 0,
        timeout_secs: 10,
        retries: 3,
        backoff_base_ms: 1,
        concurrency: 4,
        rate_limit: 0,
        user_agent: "TestHarvester/1.0".to_string(),
        ..CrawlerConfig::default()
    }
}

fn crawler(config: CrawlerConfig) -> Crawler {
    let registry = ProfileRegistry::builtin().expect("built-in profiles compile");
    Crawler::new(config, RagConfig::default(), Arc::new(registry)).expect("valid config")
}

/// A small page whose main content links to `links`
fn html_page(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a> "#, href, href))
        .collect();
    let body = format!(
        "<html><head><title>{title}</title></head><body><main>\
         <h1>{title}</h1><p>Welcome to the {title} page of the guide.</p>\
         <p>{anchors}</p></main></body></html>"
    );

    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn page_keys(result: &CrawlResult) -> Vec<&str> {
    result.pages.keys().map(String::as_str).collect()
}

#[tokio::test]
async fn test_single_page_site() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html_page("Home", &[]), 1).await;

    let result = crawler(test_config())
        .crawl(&format!("{}/", base))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.stats.processed, 1);
    assert_eq!(result.stats.skipped, 0);
    assert_eq!(result.stats.failed, 0);
    assert_eq!(result.stats.total_discovered, 1);
    assert!(!result.stats.cancelled);

    let page = result.get(&format!("{}/", base)).unwrap();
    assert_eq!(page.title, "Home");
    assert_eq!(page.depth, 0);
    assert_eq!(page.profile, "generic");
    assert!(page.content_html.starts_with("<main>"));
    assert!(page.links.is_empty());
}

#[tokio::test]
async fn test_depth_limit_stops_chain() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/a", html_page("A", &["/b"]), 1).await;
    mount(&server, "/b", html_page("B", &["/c"]), 1).await;
    mount(&server, "/c", html_page("C", &[]), 0).await;

    let config = CrawlerConfig {
        max_depth: 1,
        ..test_config()
    };
    let result = crawler(config).crawl(&format!("{}/a", base)).await.unwrap();

    let a = format!("{}/a", base);
    let b = format!("{}/b", base);
    let c = format!("{}/c", base);
    assert_eq!(page_keys(&result), vec![a.as_str(), b.as_str()]);
    assert_eq!(result.get(&b).unwrap().depth, 1);
    assert_eq!(result.get(&b).unwrap().links, vec![c.clone()]);
    assert!(result.get(&c).is_none());
    assert_eq!(result.stats.depth_limited, 1);
}

#[tokio::test]
async fn test_server_error_retried_then_failed() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html_page("Home", &["/broken"]), 1).await;
    mount(&server, "/broken", ResponseTemplate::new(500), 3).await;

    let result = crawler(test_config())
        .crawl(&format!("{}/", base))
        .await
        .unwrap();

    assert_eq!(result.stats.failed, 1);
    assert_eq!(result.stats.processed, 1);
    assert!(result.get(&format!("{}/broken", base)).is_none());
}

#[tokio::test]
async fn test_failed_seed_yields_empty_result() {
    let server = MockServer::start().await;
    mount(&server, "/", ResponseTemplate::new(404), 2).await;

    let config = CrawlerConfig {
        retries: 2,
        ..test_config()
    };
    let result = crawler(config)
        .crawl(&format!("{}/", server.uri()))
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.stats.failed, 1);
}

#[tokio::test]
async fn test_exclude_pattern_filters_links() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html_page("Home", &["/guide", "/private/notes"]), 1).await;
    mount(&server, "/guide", html_page("Guide", &[]), 1).await;
    mount(&server, "/private/notes", html_page("Notes", &[]), 0).await;

    let config = CrawlerConfig {
        exclude_patterns: vec!["/private/".to_string()],
        ..test_config()
    };
    let result = crawler(config).crawl(&format!("{}/", base)).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.stats.filtered, 1);

    // Filtered links are still recorded on the page
    let home = result.get(&format!("{}/", base)).unwrap();
    assert!(home.links.contains(&format!("{}/private/notes", base)));
}

#[tokio::test]
async fn test_cross_domain_links_rejected() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(
        &server,
        "/",
        html_page("Home", &["https://elsewhere.example.org/", "mailto:team@example.org"]),
        1,
    )
    .await;

    let result = crawler(test_config())
        .crawl(&format!("{}/", base))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.stats.rejected, 2);
    assert!(result.get(&format!("{}/", base)).unwrap().links.is_empty());
}

#[tokio::test]
async fn test_cyclic_links_fetch_each_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html_page("Home", &["/a", "/b", "/a#intro", "/"]), 1).await;
    mount(&server, "/a", html_page("A", &["/", "/b", "/c"]), 1).await;
    mount(&server, "/b", html_page("B", &["/a", "/c"]), 1).await;
    mount(&server, "/c", html_page("C", &["/", "/a", "/b"]), 1).await;

    let config = CrawlerConfig {
        max_depth: 5,
        concurrency: 8,
        ..test_config()
    };
    let result = crawler(config).crawl(&format!("{}/", base)).await.unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(result.stats.processed, 4);
    assert!(result.stats.skipped > 0);
    assert_eq!(
        result.stats.total_discovered,
        result.stats.processed + result.stats.skipped
    );
    for page in result.pages.values() {
        assert!(page.depth <= 2, "{} at depth {}", page.url, page.depth);
    }
}

#[tokio::test]
async fn test_follow_links_disabled() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html_page("Home", &["/a", "/b"]), 1).await;
    mount(&server, "/a", html_page("A", &[]), 0).await;
    mount(&server, "/b", html_page("B", &[]), 0).await;

    let config = CrawlerConfig {
        follow_links: false,
        ..test_config()
    };
    let result = crawler(config).crawl(&format!("{}/", base)).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.stats.depth_limited, 2);
}

#[tokio::test]
async fn test_redirect_resolves_links_against_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("Location", "/guide/"),
        1,
    )
    .await;
    mount(&server, "/guide/", html_page("Guide", &["install"]), 1).await;
    mount(&server, "/guide/install", html_page("Install", &[]), 1).await;

    let result = crawler(test_config())
        .crawl(&format!("{}/old", base))
        .await
        .unwrap();

    let old = result.get(&format!("{}/old", base)).unwrap();
    assert_eq!(old.title, "Guide");
    assert_eq!(old.links, vec![format!("{}/guide/install", base)]);
    assert!(result.get(&format!("{}/guide/install", base)).is_some());
}

#[tokio::test]
async fn test_redirect_to_foreign_host_is_not_crawled() {
    let server = MockServer::start().await;
    let foreign = MockServer::start().await;
    let base = server.uri();
    let landing = format!("{}/landing", foreign.uri().replace("127.0.0.1", "localhost"));

    mount(&server, "/", html_page("Home", &["/out"]), 1).await;
    mount(
        &server,
        "/out",
        ResponseTemplate::new(302).insert_header("Location", landing.as_str()),
        1,
    )
    .await;
    mount(&foreign, "/landing", html_page("Landing", &["/secret"]), 1).await;
    mount(&foreign, "/secret", html_page("Secret", &[]), 0).await;

    let result = crawler(test_config())
        .crawl(&format!("{}/", base))
        .await
        .unwrap();

    let home = format!("{}/", base);
    let out = format!("{}/out", base);
    assert_eq!(page_keys(&result), vec![home.as_str(), out.as_str()]);
    assert!(result.get(&out).unwrap().links.is_empty());
    assert!(result.pages.keys().all(|url| url.starts_with(&base)));
    assert_eq!(result.stats.rejected, 1);
}

#[tokio::test]
async fn test_include_pattern_limits_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html_page("Home", &["/guide/start", "/blog/news"]), 1).await;
    mount(&server, "/guide/start", html_page("Start", &["/guide/next", "/blog/old"]), 1).await;
    mount(&server, "/guide/next", html_page("Next", &[]), 1).await;
    mount(&server, "/blog/news", html_page("News", &[]), 0).await;
    mount(&server, "/blog/old", html_page("Old", &[]), 0).await;

    let config = CrawlerConfig {
        include_patterns: vec!["/guide/".to_string()],
        ..test_config()
    };
    let result = crawler(config).crawl(&format!("{}/", base)).await.unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.stats.filtered, 2);
    assert!(result.get(&format!("{}/guide/next", base)).is_some());
    assert!(result.get(&format!("{}/blog/news", base)).is_none());

    // The seed itself is never subject to the include list
    assert!(result.get(&format!("{}/", base)).is_some());
}

#[tokio::test]
async fn test_depth_grows_by_one_per_hop() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html_page("Home", &["/a", "/b"]), 1).await;
    mount(&server, "/a", html_page("A", &["/a/1", "/b"]), 1).await;
    mount(&server, "/b", html_page("B", &["/b/1"]), 1).await;
    mount(&server, "/a/1", html_page("A1", &["/a/1/x"]), 1).await;
    mount(&server, "/b/1", html_page("B1", &["/"]), 1).await;
    mount(&server, "/a/1/x", html_page("Deep", &[]), 0).await;

    let max_depth = 2;
    let config = CrawlerConfig {
        max_depth,
        ..test_config()
    };
    let result = crawler(config).crawl(&format!("{}/", base)).await.unwrap();

    let depth = |route: &str| result.get(&format!("{}{}", base, route)).map(|p| p.depth);
    assert_eq!(depth("/"), Some(0));
    assert_eq!(depth("/a"), Some(1));
    assert_eq!(depth("/b"), Some(1));
    assert_eq!(depth("/a/1"), Some(2));
    assert_eq!(depth("/b/1"), Some(2));
    assert_eq!(depth("/a/1/x"), None);

    for page in result.pages.values() {
        assert!(page.depth <= max_depth, "{} at depth {}", page.url, page.depth);
        if page.depth == 0 {
            continue;
        }
        let has_parent = result
            .pages
            .values()
            .any(|parent| parent.depth + 1 == page.depth && parent.links.contains(&page.url));
        assert!(has_parent, "{} has no parent one hop closer", page.url);
    }
}

#[tokio::test]
async fn test_generator_meta_selects_profile() {
    let server = MockServer::start().await;
    let base = server.uri();
    let body = r#"<html><head><title>Material</title>
        <meta name="generator" content="mkdocs-1.5.3, mkdocs-material-9.4.0"></head>
        <body>
          <div class="md-sidebar--primary"><a href="/">Home</a></div>
          <div class="md-content__inner"><h1>Setup</h1><p>Install the package.</p>
            <div class="md-footer">Previous / Next</div></div>
        </body></html>"#;
    mount(
        &server,
        "/",
        ResponseTemplate::new(200)
            .set_body_string(body)
            .insert_header("content-type", "text/html"),
        1,
    )
    .await;

    let result = crawler(test_config())
        .crawl(&format!("{}/", base))
        .await
        .unwrap();

    let page = result.get(&format!("{}/", base)).unwrap();
    assert_eq!(page.profile, "mkdocs");
    assert!(page.content_html.starts_with(r#"<div class="md-content__inner">"#));
    assert!(page.content_html.contains("Install the package."));
    assert!(!page.content_html.contains("md-footer"));
    assert!(page.navigation_html.contains("md-sidebar--primary"));
    assert_eq!(page.metadata["generator"], "mkdocs-1.5.3, mkdocs-material-9.4.0");
}

#[tokio::test]
async fn test_configured_profile_via_free_function() {
    let server = MockServer::start().await;
    let base = server.uri();
    let body = r#"<html><head><title>Wiki</title></head><body>
        <div class="wiki-body"><h2>Runbook</h2><p>Restart the service.</p>
        <pre><code class="language-bash">systemctl restart app
</code></pre></div>
        <main><p>Not the content you are looking for.</p></main>
        </body></html>"#;
    mount(
        &server,
        "/",
        ResponseTemplate::new(200)
            .set_body_string(body)
            .insert_header("content-type", "text/html"),
        1,
    )
    .await;

    let config = parse_config(
        r#"
[crawler]
delay-ms = 0
rate-limit = 0

[[profiles]]
name = "internal-wiki"
hostnames = ["127.0.0.1"]
content-selectors = ["div.wiki-body"]
"#,
    )
    .unwrap();

    let result = crawl(&format!("{}/", base), &config).await.unwrap();

    let page = result.get(&format!("{}/", base)).unwrap();
    assert_eq!(page.profile, "internal-wiki");
    assert!(page.content_html.starts_with(r#"<div class="wiki-body">"#));

    let rag = page.rag_content.as_ref().unwrap();
    assert_eq!(rag.code_blocks.len(), 1);
    assert_eq!(rag.code_blocks[0].kind(), ChunkKind::Code);
    assert_eq!(rag.code_blocks[0].content, "systemctl restart app");
    assert_eq!(rag.chunks[0].content, "Runbook Restart the service.");
    assert_eq!(
        rag.code_blocks[0].prev_chunk_id.as_ref(),
        Some(&rag.chunks[0].id)
    );
}

#[tokio::test]
async fn test_cancellation_returns_partial_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Slow", &[]).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = crawler(test_config())
        .crawl_with_cancellation(&format!("{}/", server.uri()), cancel)
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(result.stats.cancelled);
    assert!(result.is_empty());
    assert_eq!(result.stats.failed, 0);
}

#[tokio::test]
async fn test_invalid_seed_rejected_before_fetching() {
    let result = crawler(test_config()).crawl("ftp://docs.example.com/").await;
    assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
}

#[test]
fn test_crawl_blocking() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount(&server, "/", html_page("Home", &[]), 1).await;
        server
    });

    let result = crawler(test_config())
        .crawl_blocking(&format!("{}/", server.uri()))
        .unwrap();
    assert_eq!(result.len(), 1);
}
