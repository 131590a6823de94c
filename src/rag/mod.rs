//! Retrieval-augmented question answering.
//!
//! Ranks embedded passages against a query, packs the best ones into a
//! token-budgeted prompt, and generates an answer with sources.

mod assembler;
mod engine;
mod ranker;

pub use assembler::BudgetAssembler;
pub use engine::{AskEngine, AskResponse};
pub use ranker::{cosine_similarity, RelatednessFn, RelatednessRanker};

/// A passage scored against one query.
///
/// Ephemeral: produced per query, never persisted.
#[derive(Debug, Clone)]
pub struct RankedPassage {
    /// Text content.
    pub text: String,
    /// Relatedness score in [-1, 1].
    pub score: f32,
}
