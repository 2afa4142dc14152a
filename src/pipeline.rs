//! One-shot index building.
//!
//! [`IndexBuilder`] runs the full offline pipeline: load documents, chunk,
//! extract keywords, dedupe, embed, index, persist. Builds are all-or-nothing;
//! nothing touches disk until every chunk has embedded successfully.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::chunking::{ChunkerConfig, split_text};
use crate::dedup::dedupe_chunks;
use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use crate::keywords::extract_keywords;
use crate::store::VectorStore;
use crate::types::{Chunk, Document, RagError};

/// Counters from a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Documents loaded from the source directory.
    pub documents: usize,
    /// Chunks produced before deduplication.
    pub chunks: usize,
    /// Chunks surviving deduplication (and rows in the index).
    pub unique_chunks: usize,
    /// Vector width of the index.
    pub dimensions: usize,
}

/// Offline pipeline orchestrator.
pub struct IndexBuilder {
    provider: Arc<dyn EmbeddingProvider>,
    chunker: ChunkerConfig,
}

impl IndexBuilder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            chunker: ChunkerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_chunker_config(mut self, chunker: ChunkerConfig) -> Self {
        self.chunker = chunker;
        self
    }

    /// Chunks every document and dedupes across the whole corpus.
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        dedupe_chunks(self.split_into_chunks(documents))
    }

    fn split_into_chunks(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for document in documents {
            for text in split_text(&document.text, &self.chunker) {
                let keywords = extract_keywords(&text);
                let char_length = text.chars().count();
                chunks.push(Chunk {
                    source: document.source.clone(),
                    page_start: document.page,
                    page_end: document.page,
                    text,
                    keywords,
                    char_length,
                });
            }
        }
        chunks
    }

    /// Embeds the deduped chunks and builds the in-memory index.
    pub async fn build(
        &self,
        documents: &[Document],
    ) -> Result<(VectorIndex, Vec<Chunk>), RagError> {
        let raw = self.split_into_chunks(documents);
        let raw_count = raw.len();
        let chunks = dedupe_chunks(raw);
        info!(
            documents = documents.len(),
            chunks = raw_count,
            unique_chunks = chunks.len(),
            model = self.provider.model_id(),
            "embedding chunks"
        );
        self.embed_and_index(chunks).await
    }

    async fn embed_and_index(
        &self,
        chunks: Vec<Chunk>,
    ) -> Result<(VectorIndex, Vec<Chunk>), RagError> {
        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let vectors = self.provider.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(RagError::Embedding(format!(
                "provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let index = VectorIndex::build(self.provider.dimensions(), vectors)?;
        Ok((index, chunks))
    }

    /// Runs the whole pipeline from a source directory to a persisted store.
    pub async fn ingest_dir(
        &self,
        source_dir: &Path,
        store_dir: &Path,
    ) -> Result<BuildReport, RagError> {
        info!(source = %source_dir.display(), "loading documents");
        let documents = crate::ingestion::load_documents(source_dir).await?;

        let raw = self.split_into_chunks(&documents);
        let chunk_count = raw.len();
        let unique = dedupe_chunks(raw);
        info!(
            documents = documents.len(),
            chunks = chunk_count,
            unique_chunks = unique.len(),
            model = self.provider.model_id(),
            "embedding chunks"
        );
        let (index, chunks) = self.embed_and_index(unique).await?;

        let store = VectorStore::new(store_dir);
        store.persist(&index, &chunks).await?;
        info!(
            store = %store_dir.display(),
            unique_chunks = chunks.len(),
            "persisted index"
        );

        Ok(BuildReport {
            documents: documents.len(),
            chunks: chunk_count,
            unique_chunks: chunks.len(),
            dimensions: index.dimensions(),
        })
    }
}
