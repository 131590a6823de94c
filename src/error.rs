//! Error types for Spor.

use thiserror::Error;

/// Library-level error type for Spor operations.
#[derive(Error, Debug)]
pub enum SporError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No tokenizer registered for model '{0}'")]
    UnknownModel(String),

    #[error("Corpus is empty; ingest a transcript before asking questions")]
    EmptyCorpus,

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Corpus store error: {0}")]
    CorpusStore(String),

    #[error("Prompt assembly error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Spor operations.
pub type Result<T> = std::result::Result<T, SporError>;
