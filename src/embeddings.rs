//! Embedding provider seam.
//!
//! The pipeline talks to embedding backends through the object-safe
//! [`EmbeddingProvider`] trait. [`RigEmbedder`] adapts any
//! [`rig::embeddings::embedding::EmbeddingModel`] to that seam, and
//! [`MockEmbeddingProvider`] gives tests a deterministic offline backend.
//!
//! All providers return unit-length vectors so that the inner-product scores
//! produced by the index behave as cosine similarity.

use async_trait::async_trait;
use rig::embeddings::embedding::EmbeddingModel;

use crate::types::RagError;

/// Output width of the default mock provider, matching the production
/// sentence-transformer models this pipeline is deployed with.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

/// A batch embedding backend.
///
/// Implementations must be deterministic per input text within a process run
/// and must return one unit-length vector per input, in input order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds every text in the batch. An empty batch yields an empty result.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// Width of the vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// Identifier of the underlying model, for logging.
    fn model_id(&self) -> &str;
}

/// Scales a vector to unit L2 norm. Zero vectors are returned unchanged.
pub fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }
    vector
}

/// Deterministic hash-seeded embeddings for tests and offline runs.
///
/// Identical texts always map to identical vectors, so exact-match queries
/// score at the top. No semantic signal beyond that.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    fn seeded_vector(&self, text: &str) -> Vec<f32> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish().max(1);

        let mut vector = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            // xorshift64 keeps the stream cheap and fully reproducible.
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            vector.push((state as i32 as f32) / i32::MAX as f32);
        }
        l2_normalize(vector)
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|text| self.seeded_vector(text)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        "mock-embedding-provider"
    }
}

/// Bridges a rig [`EmbeddingModel`] into the [`EmbeddingProvider`] seam.
pub struct RigEmbedder<E> {
    model: E,
    model_id: String,
}

impl<E> RigEmbedder<E>
where
    E: EmbeddingModel + Send + Sync + 'static,
{
    pub fn new(model: E, model_id: impl Into<String>) -> Self {
        Self {
            model,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl<E> EmbeddingProvider for RigEmbedder<E>
where
    E: EmbeddingModel + Send + Sync + 'static,
{
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = self
            .model
            .embed_texts(texts.to_vec())
            .await
            .map_err(|err| RagError::Embedding(err.to_string()))?;
        Ok(embeddings
            .into_iter()
            .map(|embedding| {
                l2_normalize(embedding.vec.into_iter().map(|v| v as f32).collect())
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.model.ndims()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
