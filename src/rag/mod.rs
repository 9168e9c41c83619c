//! RAG segmentation for Doc-Harvest
//!
//! Splits extracted page content into retrieval-sized pieces: text chunks
//! built from paragraphs and headings, plus code blocks, tables and lists.
//! Every piece carries a content-derived id, its position in the page and
//! the ids of its neighbours.

mod chunker;
mod id;

pub use chunker::chunk_content;
pub use id::chunk_id;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Text,
    Code,
    Table,
    List,
}

/// Whether a list was ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// `<ul>`
    Unordered,
    /// `<ol>`
    Ordered,
}

/// Kind-specific data of a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChunkPayload {
    Text {
        /// Accumulated character count of the joined elements
        size: usize,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    List {
        list_type: ListType,
        items: Vec<String>,
    },
}

impl ChunkPayload {
    pub fn kind(&self) -> ChunkKind {
        match self {
            ChunkPayload::Text { .. } => ChunkKind::Text,
            ChunkPayload::Code { .. } => ChunkKind::Code,
            ChunkPayload::Table { .. } => ChunkKind::Table,
            ChunkPayload::List { .. } => ChunkKind::List,
        }
    }
}

/// One retrievable piece of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagChunk {
    /// `<url hash>-<content hash>-<position>`
    pub id: String,

    /// Textual rendering of the chunk
    pub content: String,

    /// Page the chunk was cut from
    #[serde(default)]
    pub source_url: String,

    /// Title of that page, empty when it has none
    #[serde(default)]
    pub title: String,

    /// Index in document order among all chunks of the page
    pub position: usize,

    /// Character count of `content`
    pub length: usize,

    /// Never computed by the crawler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    pub prev_chunk_id: Option<String>,

    pub next_chunk_id: Option<String>,

    #[serde(flatten)]
    pub payload: ChunkPayload,
}

impl RagChunk {
    pub fn kind(&self) -> ChunkKind {
        self.payload.kind()
    }
}

/// All chunks of one page, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagContent {
    /// Text chunks
    pub chunks: Vec<RagChunk>,
    pub code_blocks: Vec<RagChunk>,
    pub tables: Vec<RagChunk>,
    pub lists: Vec<RagChunk>,

    /// Page metadata the chunks were cut from
    pub metadata: BTreeMap<String, String>,
}

impl RagContent {
    /// Total number of chunks across all kinds
    pub fn len(&self) -> usize {
        self.chunks.len() + self.code_blocks.len() + self.tables.len() + self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every chunk, ordered by position
    pub fn in_order(&self) -> Vec<&RagChunk> {
        let mut all: Vec<&RagChunk> = self
            .chunks
            .iter()
            .chain(&self.code_blocks)
            .chain(&self.tables)
            .chain(&self.lists)
            .collect();
        all.sort_by_key(|chunk| chunk.position);
        all
    }
}
