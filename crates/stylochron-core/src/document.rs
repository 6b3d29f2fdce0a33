//! Vectorized documents and the merged two-document chunk sequence.
//!
//! A [`Document`] is an ordered list of [`Chunk`]s that all share one
//! dimensionality (the vocabulary size of the corpus they came from). The
//! engine never builds chunks itself; it consumes whatever the vectorization
//! stage produced.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One fixed-size feature vector describing a segment of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chunk(Vec<f64>);

impl Chunk {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for Chunk {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl AsRef<[f64]> for Chunk {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Chunks of one text, in original text order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Document {
    chunks: Vec<Chunk>,
}

impl Document {
    /// Build a document, rejecting chunks whose dimensionality differs from
    /// the first chunk and chunks holding NaN or infinite values.
    pub fn new(chunks: Vec<Chunk>) -> Result<Self> {
        for (chunk, c) in chunks.iter().enumerate() {
            if let Some(dimension) = c.as_slice().iter().position(|v| !v.is_finite()) {
                return Err(EngineError::NonFiniteValue { chunk, dimension });
            }
        }
        if let Some(first) = chunks.first() {
            let expected = first.dimension();
            if let Some((chunk, c)) = chunks
                .iter()
                .enumerate()
                .find(|(_, c)| c.dimension() != expected)
            {
                return Err(EngineError::RaggedDocument {
                    chunk,
                    expected,
                    found: c.dimension(),
                });
            }
        }
        Ok(Self { chunks })
    }

    /// Convenience constructor from raw row vectors.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows.into_iter().map(Chunk::from).collect())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Shared chunk dimensionality, or `None` for an empty document.
    pub fn dimension(&self) -> Option<usize> {
        self.chunks.first().map(Chunk::dimension)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let chunks = Vec::<Chunk>::deserialize(deserializer)?;
        Document::new(chunks).map_err(serde::de::Error::custom)
    }
}

/// Document A's chunks followed by document B's chunks.
///
/// Borrows the chunks of both documents; nothing is copied. Built fresh for
/// every comparison.
#[derive(Debug, Clone)]
pub struct MergedSequence<'a> {
    chunks: Vec<&'a Chunk>,
    split: usize,
}

impl<'a> MergedSequence<'a> {
    /// Merge two documents. Both must share one dimensionality; an empty
    /// document is compatible with anything.
    pub fn new(first: &'a Document, second: &'a Document) -> Result<Self> {
        if let (Some(left), Some(right)) = (first.dimension(), second.dimension()) {
            if left != right {
                return Err(EngineError::DimensionMismatch { left, right });
            }
        }
        let chunks = first.chunks().iter().chain(second.chunks()).collect();
        Ok(Self {
            chunks,
            split: first.len(),
        })
    }

    /// Wrap a single chunk slice with no second document.
    pub fn single(chunks: &'a [Chunk]) -> Self {
        Self {
            chunks: chunks.iter().collect(),
            split: chunks.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Index of the first chunk belonging to the second document (= len(A)).
    pub fn split(&self) -> usize {
        self.split
    }

    pub fn get(&self, index: usize) -> Result<&'a Chunk> {
        self.chunks
            .get(index)
            .copied()
            .ok_or(EngineError::IndexOutOfBounds {
                index,
                len: self.chunks.len(),
            })
    }
}
