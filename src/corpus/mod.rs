//! Embedded passage corpus and persistence abstraction.
//!
//! A corpus is the ordered set of embedded passages for one transcript,
//! loaded once per session and read-only thereafter.

mod memory;
mod sqlite;

pub use memory::MemoryCorpusStore;
pub use sqlite::SqliteCorpusStore;

use crate::error::{Result, SporError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A token-bounded contiguous slice of source text.
///
/// Produced by the splitter; never mutated afterwards. `token_count` is
/// computed once at creation and always matches the tokenizer's count for
/// `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Text content of this passage.
    pub text: String,
    /// Token count of `text` under the splitter's tokenizer.
    pub token_count: usize,
}

impl Passage {
    /// Create a new passage.
    pub fn new(text: String, token_count: usize) -> Self {
        Self { text, token_count }
    }
}

/// A passage paired with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedPassage {
    /// Text content of this passage.
    pub text: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl EmbeddedPassage {
    /// Create a new embedded passage.
    pub fn new(text: String, embedding: Vec<f32>) -> Self {
        Self { text, embedding }
    }
}

/// The ordered embedded passages for one source transcript.
#[derive(Debug, Clone)]
pub struct Corpus {
    source_id: String,
    title: String,
    passages: Vec<EmbeddedPassage>,
}

impl Corpus {
    /// Build a corpus, validating that all embeddings share one dimension.
    pub fn new(source_id: String, title: String, passages: Vec<EmbeddedPassage>) -> Result<Self> {
        if let Some(first) = passages.first() {
            let dims = first.embedding.len();
            if let Some(bad) = passages.iter().find(|p| p.embedding.len() != dims) {
                return Err(SporError::CorpusStore(format!(
                    "Inconsistent embedding dimensions in corpus '{}': expected {}, found {}",
                    source_id,
                    dims,
                    bad.embedding.len()
                )));
            }
        }

        Ok(Self {
            source_id,
            title,
            passages,
        })
    }

    /// Stable identifier of the source transcript.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Display title of the source transcript.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The passages, in original reading order.
    pub fn passages(&self) -> &[EmbeddedPassage] {
        &self.passages
    }

    /// Number of passages.
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether the corpus has no passages.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Embedding dimensionality, if the corpus is non-empty.
    pub fn dimensions(&self) -> Option<usize> {
        self.passages.first().map(|p| p.embedding.len())
    }
}

/// Summary information about a stored corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSummary {
    /// Source transcript identifier.
    pub source_id: String,
    /// Source transcript title.
    pub title: String,
    /// Number of stored passages.
    pub passage_count: u32,
    /// When the corpus was indexed.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for corpus persistence backends.
///
/// Implementations must preserve passage order and embedding
/// dimensionality across a save/load round trip.
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Persist a corpus, replacing any existing corpus for the same source.
    async fn save(&self, corpus: &Corpus) -> Result<usize>;

    /// Load the corpus for a source, if one is stored.
    async fn load(&self, source_id: &str) -> Result<Option<Corpus>>;

    /// Check whether a source has a stored corpus.
    async fn contains(&self, source_id: &str) -> Result<bool>;

    /// List all stored corpora.
    async fn list(&self) -> Result<Vec<CorpusSummary>>;

    /// Delete the corpus for a source, returning the number of passages removed.
    async fn delete(&self, source_id: &str) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_rejects_mixed_dimensions() {
        let passages = vec![
            EmbeddedPassage::new("a".to_string(), vec![1.0, 0.0]),
            EmbeddedPassage::new("b".to_string(), vec![1.0, 0.0, 0.0]),
        ];

        let result = Corpus::new("ep1".to_string(), "Episode 1".to_string(), passages);
        assert!(matches!(result, Err(SporError::CorpusStore(_))));
    }

    #[test]
    fn test_corpus_preserves_order() {
        let passages = vec![
            EmbeddedPassage::new("first".to_string(), vec![1.0]),
            EmbeddedPassage::new("second".to_string(), vec![2.0]),
            EmbeddedPassage::new("third".to_string(), vec![3.0]),
        ];

        let corpus = Corpus::new("ep1".to_string(), "Episode 1".to_string(), passages).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.dimensions(), Some(1));
        assert_eq!(corpus.passages()[1].text, "second");
    }
}
