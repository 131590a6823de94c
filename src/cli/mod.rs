//! CLI module for Spor.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Spor - Podcast Transcript Q&A
///
/// A CLI tool for asking questions about podcast transcripts using
/// retrieval-augmented prompts. The name "Spor" comes from the Norwegian
/// "spør," meaning "ask."
#[derive(Parser, Debug)]
#[command(name = "spor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split, embed, and index a transcript file
    Ingest {
        /// Path to a plain-text transcript file
        file: String,

        /// Force re-indexing even if already ingested
        #[arg(short, long)]
        force: bool,

        /// Token ceiling per passage (overrides config)
        #[arg(long)]
        max_tokens: Option<usize>,
    },

    /// Ask a question about an ingested transcript
    Ask {
        /// The question to ask
        question: String,

        /// Source transcript to ask about (file stem used at ingest time)
        #[arg(short, long)]
        source: String,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum number of ranked passages to consider
        #[arg(long)]
        top_n: Option<usize>,

        /// Token budget for the assembled prompt
        #[arg(short, long)]
        budget: Option<usize>,

        /// Print the assembled prompt before the answer
        #[arg(long)]
        show_prompt: bool,
    },

    /// Ask questions interactively against one transcript
    Chat {
        /// Source transcript to ask about
        #[arg(short, long)]
        source: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List ingested transcripts
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
