//! In-memory corpus store.
//!
//! Useful for testing and one-shot sessions that never persist.

use super::{Corpus, CorpusStore, CorpusSummary};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory corpus store.
pub struct MemoryCorpusStore {
    corpora: RwLock<HashMap<String, (Corpus, DateTime<Utc>)>>,
}

impl MemoryCorpusStore {
    /// Create a new in-memory corpus store.
    pub fn new() -> Self {
        Self {
            corpora: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCorpusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CorpusStore for MemoryCorpusStore {
    async fn save(&self, corpus: &Corpus) -> Result<usize> {
        let mut corpora = self.corpora.write().unwrap();
        let count = corpus.len();
        corpora.insert(corpus.source_id().to_string(), (corpus.clone(), Utc::now()));
        Ok(count)
    }

    async fn load(&self, source_id: &str) -> Result<Option<Corpus>> {
        let corpora = self.corpora.read().unwrap();
        Ok(corpora.get(source_id).map(|(c, _)| c.clone()))
    }

    async fn contains(&self, source_id: &str) -> Result<bool> {
        let corpora = self.corpora.read().unwrap();
        Ok(corpora.contains_key(source_id))
    }

    async fn list(&self) -> Result<Vec<CorpusSummary>> {
        let corpora = self.corpora.read().unwrap();

        let mut summaries: Vec<CorpusSummary> = corpora
            .values()
            .map(|(corpus, indexed_at)| CorpusSummary {
                source_id: corpus.source_id().to_string(),
                title: corpus.title().to_string(),
                passage_count: corpus.len() as u32,
                indexed_at: *indexed_at,
            })
            .collect();

        summaries.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));
        Ok(summaries)
    }

    async fn delete(&self, source_id: &str) -> Result<usize> {
        let mut corpora = self.corpora.write().unwrap();
        Ok(corpora
            .remove(source_id)
            .map(|(c, _)| c.len())
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::EmbeddedPassage;

    fn sample_corpus(source_id: &str) -> Corpus {
        Corpus::new(
            source_id.to_string(),
            "Test Episode".to_string(),
            vec![
                EmbeddedPassage::new("opening remarks".to_string(), vec![1.0, 0.0]),
                EmbeddedPassage::new("main discussion".to_string(), vec![0.0, 1.0]),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryCorpusStore::new();

        assert!(!store.contains("ep1").await.unwrap());
        assert_eq!(store.save(&sample_corpus("ep1")).await.unwrap(), 2);
        assert!(store.contains("ep1").await.unwrap());

        let loaded = store.load("ep1").await.unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.passages()[0].text, "opening remarks");

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].passage_count, 2);

        assert_eq!(store.delete("ep1").await.unwrap(), 2);
        assert!(store.load("ep1").await.unwrap().is_none());
    }
}
