//! Flat inner-product vector index.
//!
//! Vectors live in one contiguous row-major buffer and every query is an
//! exact scan. At the corpus sizes this pipeline handles (thousands of
//! chunks) a scan beats any approximate structure on both simplicity and
//! recall. Persistence is a little-endian binary file with a fixed header.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::types::RagError;

/// File identifier at the head of a persisted index.
pub const INDEX_MAGIC: [u8; 4] = *b"GVRX";

/// On-disk format version.
pub const INDEX_VERSION: u16 = 1;

/// Bytes of header ahead of the vector data: magic, version, dim, count.
const HEADER_LEN: u64 = 4 + 2 + 4 + 8;

/// An in-memory collection of equal-width vectors scored by inner product.
///
/// With unit-length vectors (all providers normalize) the inner product is
/// cosine similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    dimensions: usize,
    vectors: Vec<f32>,
}

impl VectorIndex {
    /// Builds an index from `rows`, verifying every row width.
    pub fn build(dimensions: usize, rows: Vec<Vec<f32>>) -> Result<Self, RagError> {
        let mut vectors = Vec::with_capacity(dimensions * rows.len());
        for row in rows {
            if row.len() != dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: dimensions,
                    actual: row.len(),
                });
            }
            vectors.extend_from_slice(&row);
        }
        Ok(Self {
            dimensions,
            vectors,
        })
    }

    /// Number of vectors stored.
    pub fn len(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.vectors.len() / self.dimensions
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The `i`-th stored vector, or `None` past the end.
    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        if i >= self.len() {
            return None;
        }
        let start = i * self.dimensions;
        Some(&self.vectors[start..start + self.dimensions])
    }

    /// Returns up to `k` `(position, score)` pairs ordered by descending
    /// inner product. Equal scores keep insertion order. An empty index,
    /// `k == 0`, or a query of the wrong width all yield an empty result.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if self.is_empty() || k == 0 || query.len() != self.dimensions {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = (0..self.len())
            .map(|i| {
                let start = i * self.dimensions;
                let row = &self.vectors[start..start + self.dimensions];
                let score = row.iter().zip(query).map(|(a, b)| a * b).sum();
                (i, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Writes the index to `path`. The output is byte-for-byte reproducible
    /// for the same contents.
    pub fn persist(&self, path: &Path) -> Result<(), RagError> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&INDEX_MAGIC)?;
        writer.write_all(&INDEX_VERSION.to_le_bytes())?;
        writer.write_all(&(self.dimensions as u32).to_le_bytes())?;
        writer.write_all(&(self.len() as u64).to_le_bytes())?;
        for value in &self.vectors {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads an index back from `path`.
    ///
    /// A missing file is [`RagError::MissingStore`]; anything wrong past
    /// opening (bad magic, unknown version, a header disagreeing with the
    /// file size, truncation, trailing bytes) is [`RagError::CorruptIndex`].
    pub fn load(path: &Path) -> Result<Self, RagError> {
        if !path.exists() {
            return Err(RagError::MissingStore(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        read_exact(&mut reader, &mut magic)?;
        if magic != INDEX_MAGIC {
            return Err(RagError::CorruptIndex(format!(
                "bad magic bytes {magic:?}"
            )));
        }

        let mut version = [0u8; 2];
        read_exact(&mut reader, &mut version)?;
        let version = u16::from_le_bytes(version);
        if version != INDEX_VERSION {
            return Err(RagError::CorruptIndex(format!(
                "unsupported format version {version}"
            )));
        }

        let mut dim_bytes = [0u8; 4];
        read_exact(&mut reader, &mut dim_bytes)?;
        let dimensions = u32::from_le_bytes(dim_bytes);

        let mut count_bytes = [0u8; 8];
        read_exact(&mut reader, &mut count_bytes)?;
        let count = u64::from_le_bytes(count_bytes);

        // Header fields are untrusted; check them against the real file size
        // before allocating anything.
        let expected_len = u64::from(dimensions)
            .checked_mul(count)
            .and_then(|values| values.checked_mul(4))
            .and_then(|bytes| bytes.checked_add(HEADER_LEN))
            .ok_or_else(|| {
                RagError::CorruptIndex(format!(
                    "header declares impossible size ({dimensions} x {count} vectors)"
                ))
            })?;
        if expected_len != file_len {
            return Err(RagError::CorruptIndex(format!(
                "file holds {file_len} bytes but header implies {expected_len}"
            )));
        }

        let values = (expected_len - HEADER_LEN) as usize / 4;
        let mut vectors = Vec::with_capacity(values);
        let mut value = [0u8; 4];
        for _ in 0..values {
            read_exact(&mut reader, &mut value)?;
            vectors.push(f32::from_le_bytes(value));
        }

        Ok(Self {
            dimensions: dimensions as usize,
            vectors,
        })
    }
}

fn read_exact(reader: &mut impl Read, buf: &mut [u8]) -> Result<(), RagError> {
    reader
        .read_exact(buf)
        .map_err(|err| RagError::CorruptIndex(format!("truncated index file: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> VectorIndex {
        VectorIndex::build(
            2,
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]],
        )
        .unwrap()
    }

    #[test]
    fn build_rejects_ragged_rows() {
        let err = VectorIndex::build(3, vec![vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn search_orders_by_inner_product() {
        let index = sample_index();
        let hits = index.search(&[1.0, 0.0], 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].0, 0);
        assert!((hits[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(hits[1].0, 2);
        assert_eq!(hits[2].0, 1);
    }

    #[test]
    fn search_truncates_to_k() {
        let index = sample_index();
        assert_eq!(index.search(&[1.0, 0.0], 1).len(), 1);
        assert!(index.search(&[1.0, 0.0], 0).is_empty());
    }

    #[test]
    fn search_respects_bounds_on_larger_index() {
        let rows: Vec<Vec<f32>> = (0..5).map(|i| vec![i as f32 / 10.0, 1.0]).collect();
        let index = VectorIndex::build(2, rows).unwrap();
        let hits = index.search(&[1.0, 0.0], 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].0, 4);
        assert!(hits.iter().all(|(pos, _)| *pos < index.len()));
        // Asking for more than exists caps at the index size.
        assert_eq!(index.search(&[1.0, 0.0], 10).len(), 5);
    }

    #[test]
    fn search_on_empty_index_returns_nothing() {
        let index = VectorIndex::build(2, vec![]).unwrap();
        assert!(index.search(&[1.0, 0.0], 3).is_empty());
    }

    #[test]
    fn search_rejects_wrong_query_width() {
        let index = sample_index();
        assert!(index.search(&[1.0, 0.0, 0.0], 3).is_empty());
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let index =
            VectorIndex::build(2, vec![vec![0.5, 0.5], vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        let hits = index.search(&[1.0, 1.0], 3);
        assert_eq!(hits.iter().map(|h| h.0).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn persists_and_loads_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        let index = sample_index();
        index.persist(&path).unwrap();
        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn persisted_bytes_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.bin");
        let second = dir.path().join("b.bin");
        let index = sample_index();
        index.persist(&first).unwrap();
        index.persist(&second).unwrap();
        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn load_missing_file_is_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorIndex::load(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, RagError::MissingStore(_)));
    }

    #[test]
    fn load_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        std::fs::write(&path, b"NOPE rest of the file").unwrap();
        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex(_)));
    }

    #[test]
    fn load_rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        sample_index().persist(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex(_)));
    }

    #[test]
    fn load_rejects_trailing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        sample_index().persist(&path).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        bytes.push(0);
        std::fs::write(&path, &bytes).unwrap();
        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex(_)));
    }

    #[test]
    fn load_rejects_header_with_absurd_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&INDEX_MAGIC);
        bytes.extend_from_slice(&INDEX_VERSION.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();
        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex(_)));
    }

    #[test]
    fn load_rejects_header_disagreeing_with_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        sample_index().persist(&path).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        // Claim one more vector than the file carries.
        bytes[10..18].copy_from_slice(&4u64.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();
        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex(_)));
    }

    #[test]
    fn load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        sample_index().persist(&path).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[4] = 99;
        std::fs::write(&path, &bytes).unwrap();
        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorruptIndex(_)));
    }
}
