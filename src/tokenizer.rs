//! Model-aware token counting and truncation.
//!
//! Wraps tiktoken encodings so that all token arithmetic in the pipeline
//! agrees with what the target model will actually see.

use crate::error::{Result, SporError};
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// A tokenizer bound to a specific model's encoding scheme.
pub struct Tokenizer {
    model: String,
    bpe: CoreBPE,
}

impl Tokenizer {
    /// Look up the encoding registered for a model.
    ///
    /// Fails with [`SporError::UnknownModel`] if tiktoken has no encoding
    /// for the given model name.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|_| SporError::UnknownModel(model.to_string()))?;

        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }

    /// The model this tokenizer was created for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of tokens in a string.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Truncate a string to at most `max_tokens` tokens.
    ///
    /// Returns the longest prefix of `text` that both stays within the
    /// limit and decodes to valid UTF-8. When content is actually removed
    /// a warning is logged with the original and truncated counts; this is
    /// a content-loss signal, not an error.
    pub fn truncate(&self, text: &str, max_tokens: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= max_tokens {
            return text.to_string();
        }

        warn!(
            "Truncated text from {} tokens to {} tokens",
            tokens.len(),
            max_tokens
        );

        // A token boundary can fall inside a multi-byte character; back off
        // until the prefix decodes cleanly.
        let mut end = max_tokens;
        loop {
            match self.bpe.decode(tokens[..end].to_vec()) {
                Ok(prefix) => return prefix,
                Err(_) if end > 0 => end -= 1,
                Err(_) => return String::new(),
            }
        }
    }
}
