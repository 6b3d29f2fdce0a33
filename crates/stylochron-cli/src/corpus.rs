//! Vectorized corpus files.
//!
//! ```json
//! { "vocabulary": ["and", "of", "the"],
//!   "documents": [ { "author": "...", "source": "...", "chunks": [[...], ...] } ] }
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use stylochron_core::Document;

/// One labeled document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub author: String,
    /// File the text came from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub chunks: Document,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub vocabulary: Vec<String>,
    pub documents: Vec<CorpusEntry>,
}

/// `{ "author", "path" }` entry of a vectorize index file.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexEntry {
    pub author: String,
    pub path: String,
}

impl Corpus {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus {}", path.display()))?;
        let corpus: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse corpus {}", path.display()))?;
        corpus.check_dimensions()?;
        Ok(corpus)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).context("failed to serialize corpus")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write corpus {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Every non-empty document must match the vocabulary size (when one is
    /// recorded) and each other.
    fn check_dimensions(&self) -> Result<()> {
        let mut expected = (!self.vocabulary.is_empty()).then_some(self.vocabulary.len());
        for (i, entry) in self.documents.iter().enumerate() {
            let Some(dim) = entry.chunks.dimension() else {
                continue;
            };
            match expected {
                Some(e) if e != dim => {
                    bail!("document {i} ({}) has dimension {dim}, expected {e}", entry.author)
                }
                _ => expected = Some(dim),
            }
        }
        Ok(())
    }

    /// Documents and authors as parallel vectors.
    pub fn split(&self) -> (Vec<Document>, Vec<String>) {
        self.documents
            .iter()
            .map(|e| (e.chunks.clone(), e.author.clone()))
            .unzip()
    }

    pub fn entry(&self, index: usize) -> Result<&CorpusEntry> {
        self.documents.get(index).with_context(|| {
            format!(
                "document index {index} out of range (corpus has {} documents)",
                self.documents.len()
            )
        })
    }
}

pub fn load_index(path: &Path) -> Result<Vec<IndexEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read index {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse index {}", path.display()))
}
