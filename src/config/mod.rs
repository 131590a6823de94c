//! Configuration module for Spor.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AskPrompts, Prompts};
pub use settings::{
    AskSettings, EmbeddingSettings, GeneralSettings, PromptSettings, RankingSettings, Settings,
    SplittingSettings, StoreSettings,
};
