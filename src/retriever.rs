//! Query-time retrieval service.
//!
//! A [`Retriever`] is constructed once at startup from a persisted store and
//! an embedding provider, then serves queries for the life of the process.
//! No global caches; callers own the instance and share it as they see fit.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use crate::store::VectorStore;
use crate::types::{Chunk, RagError, ScoredChunk};

/// Default number of chunks returned per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Long-lived retrieval handle over a loaded index and its chunk metadata.
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    chunks: Vec<Chunk>,
}

impl fmt::Debug for Retriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retriever")
            .field("model", &self.provider.model_id())
            .field("chunks", &self.chunks.len())
            .field("dimensions", &self.index.dimensions())
            .finish()
    }
}

impl Retriever {
    /// Loads the store at `store_dir` and verifies it matches `provider`.
    ///
    /// A non-empty index whose width differs from the provider's output is
    /// rejected; queries against it could never score meaningfully.
    pub async fn open(
        store_dir: &Path,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, RagError> {
        let (index, chunks) = VectorStore::new(store_dir).load().await?;
        if !index.is_empty() && index.dimensions() != provider.dimensions() {
            return Err(RagError::CorruptIndex(format!(
                "index width {} does not match provider {} width {}",
                index.dimensions(),
                provider.model_id(),
                provider.dimensions()
            )));
        }
        debug!(
            store = %store_dir.display(),
            chunks = chunks.len(),
            model = provider.model_id(),
            "retriever ready"
        );
        Ok(Self {
            provider,
            index,
            chunks,
        })
    }

    /// Assembles a retriever from already-loaded parts, skipping the
    /// store-consistency checks that [`Retriever::open`] performs.
    pub fn from_parts(
        provider: Arc<dyn EmbeddingProvider>,
        index: VectorIndex,
        chunks: Vec<Chunk>,
    ) -> Self {
        Self {
            provider,
            index,
            chunks,
        }
    }

    /// Number of chunks available for retrieval.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns up to `top_k` chunks by descending inner-product score.
    ///
    /// Queries that are empty after trimming, or that the provider produces
    /// no vector for, short-circuit to no results. Index positions without a
    /// metadata row are dropped with a warning rather than failing the query.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, RagError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.provider.embed_batch(&[query.to_string()]).await?;
        let Some(query_vector) = vectors.first() else {
            warn!(model = self.provider.model_id(), "no vector for query");
            return Ok(Vec::new());
        };

        let hits = self.index.search(query_vector, top_k);
        let mut results = Vec::with_capacity(hits.len());
        for (position, score) in hits {
            match self.chunks.get(position) {
                Some(chunk) => results.push(ScoredChunk {
                    chunk: chunk.clone(),
                    score,
                }),
                None => {
                    warn!(position, "index position has no metadata row");
                }
            }
        }
        Ok(results)
    }

    /// Renders hits as source-attributed context blocks for prompting.
    pub fn context_block(hits: &[ScoredChunk]) -> String {
        hits.iter()
            .map(|hit| format!("Source: {}\n{}", hit.chunk.source, hit.chunk.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
