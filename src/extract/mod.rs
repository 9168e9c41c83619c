//! Content extraction for Doc-Harvest
//!
//! This module locates the main content and the navigation of a parsed page
//! using a profile's ordered selector lists, falls back to heuristic scoring
//! when no selector matches, and serializes the chosen subtree from a copy of
//! the page with the profile's ignore selectors and post-filters applied. The
//! parsed page itself is never mutated.

mod heuristics;
mod metadata;

pub use heuristics::{content_score, is_nav_like, navigation_score, BlockStats, LinkStats};
pub use metadata::{extract_metadata, extract_title};
pub(crate) use metadata::meta_generator;

use crate::profile::{ProfileKind, Region, SiteProfile};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A serialized subtree of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    /// Tag name of the subtree root
    pub tag: String,

    /// Serialized HTML of the subtree, root element included
    pub html: String,
}

/// Extracts the main content of a page
///
/// The first content selector that matches anything wins, taking its first
/// match in document order. If none match, the richest text block is picked
/// heuristically, and `<body>` is used as a last resort. Elements matched by
/// the profile's ignore selectors are left out of the serialized copy.
///
/// # Examples
///
/// ```
/// use doc_harvest::extract::extract_content;
/// use doc_harvest::profile::SiteProfile;
/// use scraper::Html;
///
/// let page = Html::parse_document(
///     "<html><body><main><p>Hello</p><footer>bye</footer></main></body></html>",
/// );
/// let content = extract_content(&SiteProfile::generic(), &page).unwrap();
/// assert_eq!(content.tag, "main");
/// assert_eq!(content.html, "<main><p>Hello</p></main>");
/// ```
pub fn extract_content(profile: &SiteProfile, page: &Html) -> Option<ContentNode> {
    let pruned = select_ids(page, profile.ignore_selectors());

    let element = find_first(page, profile.content_selectors())
        .or_else(|| {
            debug!(
                "No content selector matched for profile {}, scoring blocks",
                profile.name()
            );
            heuristics::find_richest_content(page, &pruned)
        })
        .or_else(|| body(page))?;

    render(page, element, profile.kind(), Region::Content, &pruned)
}

/// Extracts the navigation of a page
///
/// Tries the profile's navigation selectors, then the link-density
/// heuristic. Returns `None` when neither finds anything.
pub fn extract_navigation(profile: &SiteProfile, page: &Html) -> Option<ContentNode> {
    let element = find_first(page, profile.navigation_selectors())
        .or_else(|| heuristics::find_navigation_by_links(page))?;

    render(page, element, profile.kind(), Region::Navigation, &HashSet::new())
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the first element matched by the first selector that matches
fn find_first<'a>(page: &'a Html, selectors: &[String]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|source| {
        let selector = parse_selector(source)?;
        page.select(&selector).next()
    })
}

/// Node ids of every element matched by any of the selectors
fn select_ids(page: &Html, selectors: &[String]) -> HashSet<NodeId> {
    selectors
        .iter()
        .filter_map(|source| parse_selector(source))
        .flat_map(|selector| {
            page.select(&selector)
                .map(|element| element.id())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn parse_selector(source: &str) -> Option<Selector> {
    match Selector::parse(source) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Skipping invalid selector '{}': {:?}", source, e);
            None
        }
    }
}

fn body(page: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("body").ok()?;
    page.select(&selector).next()
}

/// Serializes `element` from a pruned copy of the page
///
/// Pruned and dropped descendants are detached from the copy and the kind's
/// attribute filters are applied before html5ever writes the subtree. The
/// root is always written, even if it is itself pruned.
fn render(
    page: &Html,
    element: ElementRef<'_>,
    kind: ProfileKind,
    region: Region,
    pruned: &HashSet<NodeId>,
) -> Option<ContentNode> {
    let root = element.id();
    let removed: Vec<NodeId> = element
        .descendants()
        .skip(1)
        .filter(|node| {
            pruned.contains(&node.id())
                || node
                    .value()
                    .as_element()
                    .is_some_and(|child| kind.drops_element(region, child))
        })
        .map(|node| node.id())
        .collect();

    let mut copy = page.clone();
    for id in removed {
        if let Some(mut node) = copy.tree.get_mut(id) {
            node.detach();
        }
    }

    let kept: Vec<NodeId> = copy.tree.get(root)?.descendants().map(|n| n.id()).collect();
    for id in kept {
        if let Some(mut node) = copy.tree.get_mut(id) {
            if let Node::Element(child) = node.value() {
                kind.filter_attributes(region, child);
            }
        }
    }

    let rendered = ElementRef::wrap(copy.tree.get(root)?)?;
    Some(ContentNode {
        tag: rendered.value().name().to_string(),
        html: rendered.html(),
    })
}
