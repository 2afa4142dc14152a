//! Core data model and error type shared across the pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by ingestion, indexing, and retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document or record could not be ingested.
    #[error("ingestion error: {0}")]
    Ingestion(String),

    /// The embedding provider failed. Builds are all-or-nothing, so this
    /// aborts the whole run before anything is persisted.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// A store file (index or chunk metadata) does not exist.
    #[error("vector store file missing: {}", .0.display())]
    MissingStore(PathBuf),

    /// The index file or metadata store is unreadable or inconsistent.
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// A vector's length does not match the index dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The index and the chunk metadata store disagree on entry count.
    #[error("index holds {vectors} vectors but metadata holds {chunks} chunks")]
    LengthMismatch { vectors: usize, chunks: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// A single normalized source document, as produced by the scraping and
/// PDF-extraction collaborators and flattened at load time.
///
/// Immutable once loaded; `text` has already been through
/// [`normalize_text`](crate::normalize::normalize_text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier, typically the originating file name.
    pub source: String,
    /// Page number within the source, when known.
    pub page: Option<u32>,
    /// Normalized document text.
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, page: Option<u32>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page,
            text: text.into(),
        }
    }
}

/// A bounded-size passage of source text carrying retrieval metadata.
///
/// Chunks are uniquely identified by their `text` content: that is the
/// deduplication key, and after dedup exactly one chunk survives per
/// distinct text. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Source identifier of the originating document.
    pub source: String,
    /// First page the chunk text appears on.
    pub page_start: Option<u32>,
    /// Last page the chunk text appears on. Equals `page_start` today:
    /// chunking is per-document and documents carry a single page.
    pub page_end: Option<u32>,
    /// The chunk text itself (dedup key).
    pub text: String,
    /// Up to 15 representative lowercase tokens. Diagnostic metadata only;
    /// retrieval scoring never looks at these.
    pub keywords: Vec<String>,
    /// Length of `text` in characters.
    pub char_length: usize,
}

/// A retrieval hit: chunk metadata paired with its inner-product score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}
