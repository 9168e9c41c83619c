//! Heuristics for pages no selector recognizes
//!
//! Scoring is kept in small pure functions over counted statistics; the
//! tree walks that produce those statistics live next to them.

use ego_tree::{NodeId, NodeRef};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};
use std::collections::HashSet;

/// Terms in id/class/role that mark a block as page chrome
const NAV_LIKE_TERMS: [&str; 5] = ["nav", "menu", "footer", "header", "sidebar"];

/// Anchor text shorter than this counts as a navigation link
const SHORT_LINK_CHARS: usize = 30;

/// Elements whose text never counts as readable content
const NON_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Text statistics of a candidate content block
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlockStats {
    /// Characters of whitespace-collapsed text
    pub text_len: usize,
    pub headings: usize,
    pub paragraphs: usize,
}

/// Link statistics of a candidate navigation block
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    pub links: usize,
    /// Links whose trimmed anchor text is under 30 characters
    pub short_links: usize,
    /// Characters of whitespace-collapsed text of the whole block
    pub text_len: usize,
}

/// Scores a content candidate
///
/// A block qualifies when it has text and either a heading or more than one
/// paragraph. Returns `None` for blocks that do not qualify.
///
/// # Examples
///
/// ```
/// use doc_harvest::extract::{content_score, BlockStats};
///
/// let stats = BlockStats { text_len: 200, headings: 1, paragraphs: 3 };
/// assert_eq!(content_score(&stats), Some(280));
///
/// let single = BlockStats { text_len: 200, headings: 0, paragraphs: 1 };
/// assert_eq!(content_score(&single), None);
/// ```
pub fn content_score(stats: &BlockStats) -> Option<usize> {
    let qualifies = stats.text_len > 0 && (stats.headings > 0 || stats.paragraphs > 1);
    qualifies.then(|| stats.text_len + stats.headings * 50 + stats.paragraphs * 10)
}

/// Scores a navigation candidate
///
/// Needs more than three links, a link density (links per text character)
/// above 0.1, and more than 70% short links. The score is
/// `links * density * ratio`.
pub fn navigation_score(stats: &LinkStats) -> Option<f64> {
    if stats.text_len == 0 || stats.links <= 3 {
        return None;
    }

    let density = stats.links as f64 / stats.text_len as f64;
    let ratio = stats.short_links as f64 / stats.links as f64;

    (density > 0.1 && ratio > 0.7).then(|| stats.links as f64 * density * ratio)
}

/// Returns true if the element's id, class or role mentions page chrome
pub fn is_nav_like(element: &Element) -> bool {
    ["id", "class", "role"].iter().any(|attr| {
        element
            .attr(attr)
            .map(|value| {
                let value = value.to_lowercase();
                NAV_LIKE_TERMS.iter().any(|term| value.contains(term))
            })
            .unwrap_or(false)
    })
}

/// Picks the `div`/`section`/`article` with the best content score
///
/// Blocks inside pruned subtrees and nav-like blocks are not candidates.
/// Ties keep the earliest block in document order.
pub(crate) fn find_richest_content<'a>(
    page: &'a Html,
    pruned: &HashSet<NodeId>,
) -> Option<ElementRef<'a>> {
    let mut best: Option<(ElementRef<'a>, usize)> = None;

    for element in elements(page, &["div", "section", "article"]) {
        if is_nav_like(element.value()) || is_pruned(*element, pruned) {
            continue;
        }

        if let Some(score) = content_score(&block_stats(element, pruned)) {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((element, score));
            }
        }
    }

    best.map(|(element, _)| element)
}

/// Picks the `div`/`nav`/`aside`/`ul` with the best navigation score
pub(crate) fn find_navigation_by_links(page: &Html) -> Option<ElementRef<'_>> {
    let mut best: Option<(ElementRef<'_>, f64)> = None;

    for element in elements(page, &["div", "nav", "aside", "ul"]) {
        if let Some(score) = navigation_score(&link_stats(element)) {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((element, score));
            }
        }
    }

    best.map(|(element, _)| element)
}

fn elements<'a>(
    page: &'a Html,
    names: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    page.tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |element| names.contains(&element.value().name()))
}

fn is_pruned(node: NodeRef<'_, Node>, pruned: &HashSet<NodeId>) -> bool {
    !pruned.is_empty()
        && std::iter::once(node)
            .chain(node.ancestors())
            .any(|n| pruned.contains(&n.id()))
}

/// Counts text, headings and paragraphs below an element
fn block_stats(element: ElementRef<'_>, pruned: &HashSet<NodeId>) -> BlockStats {
    let mut stats = BlockStats::default();
    let mut text = String::new();
    let mut stack: Vec<NodeRef<'_, Node>> = element.children().rev().collect();

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(t) => {
                text.push_str(t);
                text.push(' ');
            }
            Node::Element(child) => {
                let name = child.name();
                if pruned.contains(&node.id()) || NON_TEXT_ELEMENTS.contains(&name) {
                    continue;
                }
                match name {
                    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => stats.headings += 1,
                    "p" => stats.paragraphs += 1,
                    _ => {}
                }
                stack.extend(node.children().rev());
            }
            _ => {}
        }
    }

    stats.text_len = collapsed_len(&text);
    stats
}

/// Counts links and text below an element
fn link_stats(element: ElementRef<'_>) -> LinkStats {
    let mut stats = LinkStats {
        text_len: collapsed_len(&element.text().collect::<Vec<_>>().join(" ")),
        ..LinkStats::default()
    };

    for link in element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "a")
    {
        stats.links += 1;
        let anchor = link.text().collect::<String>();
        if anchor.trim().chars().count() < SHORT_LINK_CHARS {
            stats.short_links += 1;
        }
    }

    stats
}

fn collapsed_len(text: &str) -> usize {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0;
    }
    words.iter().map(|w| w.chars().count()).sum::<usize>() + words.len() - 1
}
