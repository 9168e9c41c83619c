use super::{chunk_id, ChunkKind, ChunkPayload, ListType, RagChunk, RagContent};
use crate::config::RagConfig;
use crate::extract::collapse_whitespace;
use scraper::node::Element;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

/// A chunk before positions and ids are assigned
struct Piece {
    /// Document order of the element the piece starts at
    order: usize,
    content: String,
    payload: ChunkPayload,
}

/// Paragraph and heading text waiting to become a text chunk
#[derive(Default)]
struct TextBuffer {
    parts: Vec<String>,
    size: usize,
    order: usize,
}

impl TextBuffer {
    fn push(&mut self, order: usize, text: String) {
        if self.parts.is_empty() {
            self.order = order;
        }
        self.size += text.chars().count();
        self.parts.push(text);
    }

    fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn flush(&mut self) -> Option<Piece> {
        if self.is_empty() {
            return None;
        }

        let piece = Piece {
            order: self.order,
            content: self.parts.join(" "),
            payload: ChunkPayload::Text { size: self.size },
        };
        *self = Self::default();
        Some(piece)
    }
}

/// Splits serialized content HTML into RAG chunks
///
/// Paragraphs and headings are accumulated into text chunks, flushing
/// before every heading that follows buffered text and whenever the
/// buffered size reaches `chunk_size` characters. Code blocks, tables and
/// lists become chunks of their own when the matching switch is on.
///
/// All chunks are numbered in document order and linked to their
/// neighbours across kinds. `chunk_overlap` and `min_chunk_size` are not
/// applied.
///
/// # Arguments
///
/// * `content_html` - Serialized content subtree of the page
/// * `source_url` - Normalized URL of the page, used in chunk ids and
///   copied onto every chunk
/// * `metadata` - Page metadata, carried into the result; its `title` is
///   copied onto every chunk
/// * `config` - Chunk size and per-kind switches
///
/// # Examples
///
/// ```
/// use doc_harvest::config::RagConfig;
/// use doc_harvest::rag::chunk_content;
/// use std::collections::BTreeMap;
///
/// let html = "<h1>Intro</h1><p>Hello there.</p><pre class=\"language-sh\">ls</pre>";
/// let rag = chunk_content(html, "https://docs.example.com/", BTreeMap::new(), &RagConfig::default());
///
/// assert_eq!(rag.chunks.len(), 1);
/// assert_eq!(rag.chunks[0].content, "Intro Hello there.");
/// assert_eq!(rag.code_blocks[0].position, 1);
/// assert_eq!(rag.code_blocks[0].prev_chunk_id.as_ref(), Some(&rag.chunks[0].id));
/// ```
pub fn chunk_content(
    content_html: &str,
    source_url: &str,
    metadata: BTreeMap<String, String>,
    config: &RagConfig,
) -> RagContent {
    let fragment = Html::parse_fragment(content_html);
    let mut pieces = Vec::new();
    let mut buffer = TextBuffer::default();

    for (order, node) in fragment.tree.root().descendants().enumerate() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        match element.value().name() {
            name @ ("p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let text = collapse_whitespace(&element.text().collect::<String>());
                if text.is_empty() {
                    continue;
                }
                if name != "p" {
                    pieces.extend(buffer.flush());
                }
                buffer.push(order, text);
                if buffer.size >= config.chunk_size {
                    pieces.extend(buffer.flush());
                }
            }
            "pre" if config.extract_code_blocks => pieces.extend(code_block(order, element)),
            "code" if config.extract_code_blocks && !has_ancestor(element, "pre") => {
                pieces.extend(code_block(order, element))
            }
            "table" if config.extract_tables => pieces.extend(table(order, element)),
            "ul" | "ol" if config.extract_lists => pieces.extend(list(order, element)),
            _ => {}
        }
    }
    pieces.extend(buffer.flush());

    pieces.sort_by_key(|piece| piece.order);
    assemble(pieces, source_url, metadata)
}

/// Assigns positions and ids, links neighbours and groups by kind
fn assemble(pieces: Vec<Piece>, source_url: &str, metadata: BTreeMap<String, String>) -> RagContent {
    let ids: Vec<String> = pieces
        .iter()
        .enumerate()
        .map(|(position, piece)| chunk_id(&piece.content, source_url, position))
        .collect();

    let title = metadata.get("title").cloned().unwrap_or_default();
    let mut rag = RagContent {
        metadata,
        ..RagContent::default()
    };

    for (position, (piece, id)) in pieces.into_iter().zip(ids.iter()).enumerate() {
        let chunk = RagChunk {
            id: id.clone(),
            length: piece.content.chars().count(),
            content: piece.content,
            source_url: source_url.to_string(),
            title: title.clone(),
            position,
            embedding: None,
            prev_chunk_id: position.checked_sub(1).and_then(|i| ids.get(i)).cloned(),
            next_chunk_id: ids.get(position + 1).cloned(),
            payload: piece.payload,
        };

        match chunk.kind() {
            ChunkKind::Text => rag.chunks.push(chunk),
            ChunkKind::Code => rag.code_blocks.push(chunk),
            ChunkKind::Table => rag.tables.push(chunk),
            ChunkKind::List => rag.lists.push(chunk),
        }
    }

    rag
}

fn code_block(order: usize, element: ElementRef<'_>) -> Option<Piece> {
    let text = element.text().collect::<String>();
    let code = text.trim_start_matches(|c: char| c == '\n' || c == '\r').trim_end().to_string();
    if code.trim().is_empty() {
        return None;
    }

    let language = language_class(element.value())
        .or_else(|| element.value().attr("data-language").map(str::to_string))
        .or_else(|| {
            descendants_named(element, "code")
                .next()
                .and_then(|inner| language_class(inner.value()))
        });

    Some(Piece {
        order,
        content: code.clone(),
        payload: ChunkPayload::Code { language, code },
    })
}

fn table(order: usize, element: ElementRef<'_>) -> Option<Piece> {
    let headers: Vec<String> = descendants_named(element, "th").map(text_of).collect();
    let rows: Vec<Vec<String>> = descendants_named(element, "tr")
        .map(|row| descendants_named(row, "td").map(text_of).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    if headers.is_empty() && rows.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    if !headers.is_empty() {
        lines.push(headers.join(" | "));
    }
    lines.extend(rows.iter().map(|cells| cells.join(" | ")));

    Some(Piece {
        order,
        content: lines.join("\n"),
        payload: ChunkPayload::Table { headers, rows },
    })
}

fn list(order: usize, element: ElementRef<'_>) -> Option<Piece> {
    let items: Vec<String> = descendants_named(element, "li").map(text_of).collect();
    if items.is_empty() {
        return None;
    }

    let list_type = if element.value().name() == "ol" {
        ListType::Ordered
    } else {
        ListType::Unordered
    };

    Some(Piece {
        order,
        content: items.join("\n"),
        payload: ChunkPayload::List { list_type, items },
    })
}

fn descendants_named<'a>(
    element: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == name)
}

fn has_ancestor(element: ElementRef<'_>, name: &str) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == name)
}

fn language_class(element: &Element) -> Option<String> {
    element
        .classes()
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|language| !language.is_empty())
        .map(str::to_string)
}

fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}
