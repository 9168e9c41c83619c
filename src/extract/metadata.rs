use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// `<meta name=...>` keys always present in page metadata
const META_NAMES: [&str; 4] = ["description", "keywords", "author", "generator"];

/// Collects descriptive metadata from a page
///
/// Always contains `title`, `description`, `keywords`, `author`,
/// `generator` (empty when the page lacks them) and `url`. Every
/// `<meta property="og:...">` is added with the `og:` prefix rewritten to
/// `og_`.
///
/// # Examples
///
/// ```
/// use doc_harvest::extract::extract_metadata;
/// use scraper::Html;
/// use url::Url;
///
/// let page = Html::parse_document(
///     r#"<html><head><title>Intro</title>
///        <meta property="og:type" content="article"></head></html>"#,
/// );
/// let url = Url::parse("https://docs.example.com/intro").unwrap();
/// let metadata = extract_metadata(&page, &url);
///
/// assert_eq!(metadata["title"], "Intro");
/// assert_eq!(metadata["og_type"], "article");
/// assert_eq!(metadata["author"], "");
/// ```
pub fn extract_metadata(page: &Html, url: &Url) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    metadata.insert("title".to_string(), extract_title(page).unwrap_or_default());
    for name in META_NAMES {
        metadata.insert(
            name.to_string(),
            meta_named(page, name).unwrap_or_default(),
        );
    }
    metadata.insert("url".to_string(), url.to_string());

    if let Ok(selector) = Selector::parse("meta[property][content]") {
        for meta in page.select(&selector) {
            let element = meta.value();
            let (Some(property), Some(content)) = (element.attr("property"), element.attr("content"))
            else {
                continue;
            };
            if let Some(key) = property.strip_prefix("og:") {
                metadata
                    .entry(format!("og_{}", key))
                    .or_insert_with(|| content.trim().to_string());
            }
        }
    }

    metadata
}

/// Extracts the page title from the `<title>` tag
pub fn extract_title(page: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    page.select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads the `<meta name="generator">` content of a page
pub(crate) fn meta_generator(page: &Html) -> Option<String> {
    meta_named(page, "generator")
}

/// Content of the first `<meta name=...>` with a matching name
///
/// Names compare case-insensitively.
fn meta_named(page: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse("meta[name][content]").ok()?;

    page.select(&selector)
        .find(|meta| {
            meta.value()
                .attr("name")
                .map(|n| n.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
}
