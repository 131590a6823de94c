//! Spor - Podcast Transcript Q&A
//!
//! A CLI tool for asking questions about podcast transcripts using
//! retrieval-augmented prompts.
//!
//! The name "Spor" comes from the Norwegian "spør," meaning "ask."
//!
//! # Overview
//!
//! Spor allows you to:
//! - Split long transcripts into token-bounded passages
//! - Build a searchable embedded corpus from transcript text
//! - Rank passages against a question by semantic relatedness
//! - Assemble a grounded prompt that fits a model's token budget
//! - Ask questions and get AI-powered answers
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `tokenizer` - Model-aware token counting and truncation
//! - `splitter` - Recursive balanced transcript splitting
//! - `corpus` - Embedded passage corpus and persistence
//! - `embedding` - Embedding generation
//! - `rag` - Ranking, prompt assembly, and question answering
//! - `orchestrator` - Ingestion pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use spor::config::Settings;
//! use spor::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     // Ingest a transcript file into the corpus store
//!     let result = orchestrator.ingest_transcript("episode42.txt".as_ref(), false).await?;
//!     println!("Indexed {} passages", result.passages_indexed);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod splitter;
pub mod tokenizer;

pub use error::{Result, SporError};
