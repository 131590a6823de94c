//! Ingestion pipeline orchestrator.
//!
//! Coordinates the process from transcript file to persisted embedded
//! corpus: split into token-bounded passages, embed in batch, store.

use crate::config::{Prompts, Settings};
use crate::corpus::{Corpus, CorpusStore, EmbeddedPassage, SqliteCorpusStore};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, SporError};
use crate::splitter::BalancedSplitter;
use crate::tokenizer::Tokenizer;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Spor pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    store: Arc<SqliteCorpusStore>,
}

impl Orchestrator {
    /// Create a new orchestrator with default configuration.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let store = Arc::new(SqliteCorpusStore::new(&settings.sqlite_path())?);

        Ok(Self {
            settings,
            prompts,
            embedder,
            store,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        store: Arc<SqliteCorpusStore>,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder,
            store,
        }
    }

    /// Get a reference to the corpus store (as trait object).
    pub fn store(&self) -> Arc<dyn CorpusStore> {
        self.store.clone() as Arc<dyn CorpusStore>
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the loaded prompts.
    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Ingest a transcript file: split, embed, and persist its corpus.
    ///
    /// The file stem is the stable source identifier; re-ingesting the
    /// same file replaces the stored corpus.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn ingest_transcript(&self, path: &Path, force: bool) -> Result<IngestResult> {
        let source_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                SporError::InvalidInput(format!("Not a usable transcript path: {:?}", path))
            })?
            .to_string();

        if !force && self.store.contains(&source_id).await? {
            info!("Source '{}' is already indexed, skipping", source_id);
            return Ok(IngestResult {
                source_id,
                passages_indexed: 0,
                skipped: true,
            });
        }

        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Err(SporError::InvalidInput(format!(
                "Transcript file {:?} is empty",
                path
            )));
        }

        // Split into token-bounded passages
        info!("Splitting transcript '{}'", source_id);
        let tokenizer = Tokenizer::for_model(&self.settings.splitting.model)?;
        let splitter = BalancedSplitter::new(&tokenizer, self.settings.splitting.max_tokens)
            .with_max_recursion(self.settings.splitting.max_recursion);
        let passages = splitter.split(&text);
        info!("Split into {} passages", passages.len());

        // Embed in batch, order-preserving
        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != passages.len() {
            return Err(SporError::Embedding(format!(
                "Embedded {} of {} passages",
                embeddings.len(),
                passages.len()
            )));
        }

        let embedded: Vec<EmbeddedPassage> = passages
            .into_iter()
            .zip(embeddings)
            .map(|(passage, embedding)| EmbeddedPassage::new(passage.text, embedding))
            .collect();

        let title = source_id.replace(['_', '-'], " ");
        let corpus = Corpus::new(source_id.clone(), title, embedded)?;
        let count = self.store.save(&corpus).await?;

        Ok(IngestResult {
            source_id,
            passages_indexed: count,
            skipped: false,
        })
    }

    /// Load the corpus for a source, failing if none is stored.
    pub async fn load_corpus(&self, source_id: &str) -> Result<Corpus> {
        self.store.load(source_id).await?.ok_or_else(|| {
            SporError::InvalidInput(format!(
                "No corpus stored for '{}'. Run 'spor ingest' first.",
                source_id
            ))
        })
    }
}

/// Result of ingesting a transcript.
#[derive(Debug)]
pub struct IngestResult {
    /// Stable source identifier (transcript file stem).
    pub source_id: String,
    /// Number of passages embedded and stored.
    pub passages_indexed: usize,
    /// Whether ingestion was skipped (already indexed).
    pub skipped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;

    struct CountingEmbedder;

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::new();
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn test_orchestrator() -> Orchestrator {
        Orchestrator::with_components(
            Settings::default(),
            Prompts::default(),
            Arc::new(CountingEmbedder),
            Arc::new(SqliteCorpusStore::in_memory().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_ingest_and_reload() {
        let orchestrator = test_orchestrator();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("morning_show_ep7.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Welcome back to the show.\n\nToday we cover ferries.").unwrap();

        let result = orchestrator.ingest_transcript(&path, false).await.unwrap();
        assert_eq!(result.source_id, "morning_show_ep7");
        assert!(!result.skipped);
        assert!(result.passages_indexed >= 1);

        let corpus = orchestrator.load_corpus("morning_show_ep7").await.unwrap();
        assert_eq!(corpus.len(), result.passages_indexed);
        assert_eq!(corpus.dimensions(), Some(2));
        assert_eq!(corpus.title(), "morning show ep7");

        // Second ingest without force is a no-op
        let again = orchestrator.ingest_transcript(&path, false).await.unwrap();
        assert!(again.skipped);
    }

    #[tokio::test]
    async fn test_missing_corpus_errors() {
        let orchestrator = test_orchestrator();
        let result = orchestrator.load_corpus("never_ingested").await;
        assert!(matches!(result, Err(SporError::InvalidInput(_))));
    }
}
