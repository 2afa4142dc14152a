//! Chunking, embedding, and inner-product retrieval for scraped government
//! documents.
//!
//! ```text
//! Scraped JSON dir ──► ingestion::load_documents ──► Vec<Document>
//!                                 │
//!                                 ├─► normalize (boilerplate stripping)
//!                                 └─► records (fee / processing-time / Q&A)
//!
//! Vec<Document> ──► pipeline::IndexBuilder ──► chunking + keywords + dedup
//!                                 │
//!                                 ├─► embeddings::EmbeddingProvider
//!                                 └─► index::VectorIndex ──► store::VectorStore
//!
//! Persisted store ──► retriever::Retriever ──► ScoredChunk / context blocks
//! ```
//!
//! The offline half ([`IndexBuilder`]) turns a directory of scraped JSON
//! exports into two files, a binary vector index and a JSON chunk-metadata
//! list. The online half ([`Retriever`]) loads that pair once and answers
//! top-k queries for the life of the process.

pub mod chunking;
pub mod dedup;
pub mod embeddings;
pub mod index;
pub mod ingestion;
pub mod keywords;
pub mod normalize;
pub mod pipeline;
pub mod retriever;
pub mod store;
pub mod types;

pub use chunking::ChunkerConfig;
pub use embeddings::{EmbeddingProvider, MockEmbeddingProvider, RigEmbedder};
pub use index::VectorIndex;
pub use pipeline::{BuildReport, IndexBuilder};
pub use retriever::{DEFAULT_TOP_K, Retriever};
pub use store::VectorStore;
pub use types::{Chunk, Document, RagError, ScoredChunk};
