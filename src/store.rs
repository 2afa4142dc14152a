//! Paired on-disk store: binary index plus JSON chunk metadata.
//!
//! The two files live side by side in one directory and are only meaningful
//! together. Positions in the index are row numbers into the metadata list,
//! so both load paths verify the counts agree.

use std::path::PathBuf;

use tokio::fs;
use tracing::debug;

use crate::index::VectorIndex;
use crate::types::{Chunk, RagError};

/// File name of the binary vector index inside a store directory.
pub const INDEX_FILE: &str = "index.bin";

/// File name of the chunk metadata list inside a store directory.
pub const METADATA_FILE: &str = "chunks.json";

/// Handle on a store directory.
#[derive(Debug, Clone)]
pub struct VectorStore {
    dir: PathBuf,
}

impl VectorStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    /// Writes both files, creating the directory if needed.
    ///
    /// Fails up front if `index` and `chunks` disagree on entry count, so a
    /// mismatched pair is never persisted.
    pub async fn persist(&self, index: &VectorIndex, chunks: &[Chunk]) -> Result<(), RagError> {
        if index.len() != chunks.len() {
            return Err(RagError::LengthMismatch {
                vectors: index.len(),
                chunks: chunks.len(),
            });
        }

        fs::create_dir_all(&self.dir).await?;
        index.persist(&self.index_path())?;

        let json = serde_json::to_vec_pretty(chunks)?;
        fs::write(self.metadata_path(), json).await?;

        debug!(
            dir = %self.dir.display(),
            vectors = index.len(),
            "persisted vector store"
        );
        Ok(())
    }

    /// Loads both files and verifies they line up.
    ///
    /// Either file being absent is [`RagError::MissingStore`]; unparsable
    /// metadata or disagreeing counts are [`RagError::CorruptIndex`].
    pub async fn load(&self) -> Result<(VectorIndex, Vec<Chunk>), RagError> {
        let index = VectorIndex::load(&self.index_path())?;

        let metadata_path = self.metadata_path();
        if !metadata_path.exists() {
            return Err(RagError::MissingStore(metadata_path));
        }
        let json = fs::read(&metadata_path).await?;
        let chunks: Vec<Chunk> = serde_json::from_slice(&json)
            .map_err(|err| RagError::CorruptIndex(format!("unreadable chunk metadata: {err}")))?;

        if index.len() != chunks.len() {
            return Err(RagError::CorruptIndex(format!(
                "index holds {} vectors but metadata holds {} chunks",
                index.len(),
                chunks.len()
            )));
        }

        debug!(
            dir = %self.dir.display(),
            vectors = index.len(),
            "loaded vector store"
        );
        Ok((index, chunks))
    }

    /// Whether the directory already holds both store files.
    pub fn is_populated(&self) -> bool {
        self.index_path().exists() && self.metadata_path().exists()
    }
}
