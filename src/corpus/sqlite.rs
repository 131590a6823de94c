//! SQLite-backed corpus store.
//!
//! Embeddings are stored as little-endian f32 blobs and passages keep an
//! explicit position column so load order always matches reading order.

use super::{Corpus, CorpusStore, CorpusSummary, EmbeddedPassage};
use crate::error::{Result, SporError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS passages (
        id TEXT PRIMARY KEY,
        source_id TEXT NOT NULL,
        title TEXT NOT NULL,
        position INTEGER NOT NULL,
        content TEXT NOT NULL,
        embedding BLOB NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_passages_source_id ON passages(source_id);
"#;

/// SQLite-backed corpus store.
pub struct SqliteCorpusStore {
    conn: Mutex<Connection>,
}

impl SqliteCorpusStore {
    /// Open (or create) a corpus database at the given path.
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrent read behavior
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened corpus store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory corpus store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize an embedding to little-endian bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize an embedding from little-endian bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }
}

#[async_trait]
impl CorpusStore for SqliteCorpusStore {
    async fn save(&self, corpus: &Corpus) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM passages WHERE source_id = ?1",
            params![corpus.source_id()],
        )?;

        let indexed_at = Utc::now().to_rfc3339();
        for (position, passage) in corpus.passages().iter().enumerate() {
            tx.execute(
                "INSERT INTO passages (id, source_id, title, position, content, embedding, indexed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    Uuid::new_v4().to_string(),
                    corpus.source_id(),
                    corpus.title(),
                    position as i64,
                    passage.text,
                    Self::embedding_to_bytes(&passage.embedding),
                    indexed_at,
                ],
            )?;
        }

        tx.commit()?;

        debug!(
            "Stored {} passages for source '{}'",
            corpus.len(),
            corpus.source_id()
        );
        Ok(corpus.len())
    }

    async fn load(&self, source_id: &str) -> Result<Option<Corpus>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT title, content, embedding FROM passages
             WHERE source_id = ?1 ORDER BY position ASC",
        )?;

        let mut title = String::new();
        let mut passages = Vec::new();

        let rows = stmt.query_map(params![source_id], |row| {
            let title: String = row.get(0)?;
            let content: String = row.get(1)?;
            let bytes: Vec<u8> = row.get(2)?;
            Ok((title, content, bytes))
        })?;

        for row in rows {
            let (row_title, content, bytes) = row?;
            title = row_title;
            passages.push(EmbeddedPassage::new(
                content,
                Self::bytes_to_embedding(&bytes),
            ));
        }

        if passages.is_empty() {
            return Ok(None);
        }

        // Corpus::new re-validates embedding dimensionality on every load.
        Ok(Some(Corpus::new(source_id.to_string(), title, passages)?))
    }

    async fn contains(&self, source_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM passages WHERE source_id = ?1",
            params![source_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    async fn list(&self) -> Result<Vec<CorpusSummary>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT source_id, title, COUNT(*), MAX(indexed_at) FROM passages
             GROUP BY source_id ORDER BY MAX(indexed_at) DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let source_id: String = row.get(0)?;
            let title: String = row.get(1)?;
            let passage_count: i64 = row.get(2)?;
            let indexed_at: String = row.get(3)?;
            Ok((source_id, title, passage_count, indexed_at))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (source_id, title, passage_count, indexed_at) = row?;
            let indexed_at = DateTime::parse_from_rfc3339(&indexed_at)
                .map_err(|e| {
                    SporError::CorpusStore(format!("Invalid indexed_at timestamp: {}", e))
                })?
                .with_timezone(&Utc);

            summaries.push(CorpusSummary {
                source_id,
                title,
                passage_count: passage_count as u32,
                indexed_at,
            });
        }

        Ok(summaries)
    }

    async fn delete(&self, source_id: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM passages WHERE source_id = ?1",
            params![source_id],
        )?;
        Ok(deleted)
    }
}
