//! Recursive balanced splitting of transcripts into token-bounded passages.
//!
//! Long transcripts are divided at natural delimiters (paragraph breaks,
//! then line breaks, then sentence ends), halving by token balance rather
//! than character count, until every passage fits under the ceiling.

use crate::corpus::Passage;
use crate::tokenizer::Tokenizer;
use tracing::warn;

/// Delimiters tried in priority order when halving a text.
const DELIMITERS: [&str; 3] = ["\n\n", "\n", ". "];

/// Default recursion budget before falling back to truncation.
pub const DEFAULT_MAX_RECURSION: usize = 5;

/// Splits text into passages of at most `max_tokens` tokens each.
pub struct BalancedSplitter<'a> {
    tokenizer: &'a Tokenizer,
    max_tokens: usize,
    max_recursion: usize,
}

impl<'a> BalancedSplitter<'a> {
    /// Create a splitter with the default recursion budget.
    pub fn new(tokenizer: &'a Tokenizer, max_tokens: usize) -> Self {
        Self {
            tokenizer,
            max_tokens,
            max_recursion: DEFAULT_MAX_RECURSION,
        }
    }

    /// Set the recursion budget.
    pub fn with_max_recursion(mut self, max_recursion: usize) -> Self {
        self.max_recursion = max_recursion;
        self
    }

    /// Split a text into passages, each within the token ceiling.
    ///
    /// Reading order is preserved and no content is lost unless no
    /// delimiter yields a usable split within the recursion budget, in
    /// which case the remaining text is truncated (logged, not fatal).
    pub fn split(&self, text: &str) -> Vec<Passage> {
        self.split_recursive(text, self.max_recursion)
            .into_iter()
            .map(|piece| {
                let token_count = self.tokenizer.count(&piece);
                Passage::new(piece, token_count)
            })
            .collect()
    }

    fn split_recursive(&self, text: &str, budget: usize) -> Vec<String> {
        if self.tokenizer.count(text) <= self.max_tokens {
            return vec![text.to_string()];
        }

        if budget == 0 {
            warn!("Recursion budget exhausted; truncating oversized passage");
            return vec![self.tokenizer.truncate(text, self.max_tokens)];
        }

        for delimiter in DELIMITERS {
            let (left, right) = halved_by_delimiter(text, delimiter, self.tokenizer);
            if left.is_empty() || right.is_empty() {
                // This delimiter produced no usable split; try a finer one.
                continue;
            }

            let mut passages = self.split_recursive(&left, budget - 1);
            passages.extend(self.split_recursive(&right, budget - 1));
            return passages;
        }

        // No delimiter found at all (e.g. one enormous unbroken line).
        warn!("No split point found; truncating oversized passage");
        vec![self.tokenizer.truncate(text, self.max_tokens)]
    }
}

/// Split a text in two on a delimiter, balancing tokens on each side.
///
/// Scans candidate boundaries left to right and stops as soon as moving the
/// boundary forward no longer improves the balance. This greedy early exit
/// can overshoot the true optimum for uneven delimiter distributions;
/// existing chunk boundaries depend on that behavior, so it is kept as-is.
///
/// Returns `(text, "")` when the delimiter does not occur.
pub fn halved_by_delimiter(text: &str, delimiter: &str, tokenizer: &Tokenizer) -> (String, String) {
    let chunks: Vec<&str> = text.split(delimiter).collect();
    match chunks.len() {
        1 => return (text.to_string(), String::new()),
        2 => return (chunks[0].to_string(), chunks[1].to_string()),
        _ => {}
    }

    let halfway = tokenizer.count(text) / 2;
    let mut best_diff = halfway;
    let mut boundary = 0;

    for i in 0..chunks.len() {
        boundary = i;
        let left = chunks[..=i].join(delimiter);
        let diff = halfway.abs_diff(tokenizer.count(&left));
        if diff >= best_diff {
            break;
        }
        best_diff = diff;
    }

    (
        chunks[..boundary].join(delimiter),
        chunks[boundary..].join(delimiter),
    )
}
