//! Relatedness ranking of embedded passages against a query vector.

use super::RankedPassage;
use crate::corpus::Corpus;
use crate::error::{Result, SporError};

/// A similarity strategy between two embedding vectors.
pub type RelatednessFn = fn(&[f32], &[f32]) -> f32;

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Ranks corpus passages by relatedness to a pre-computed query embedding.
///
/// The query embedding itself comes from an external [`crate::embedding::Embedder`]
/// call; this type only consumes the vector.
pub struct RelatednessRanker {
    top_n: usize,
    relatedness: RelatednessFn,
}

impl RelatednessRanker {
    /// Create a ranker with cosine similarity and the default result cap.
    pub fn new() -> Self {
        Self {
            top_n: 100,
            relatedness: cosine_similarity,
        }
    }

    /// Set the maximum number of results returned per query.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Swap in a different similarity strategy.
    pub fn with_relatedness(mut self, relatedness: RelatednessFn) -> Self {
        self.relatedness = relatedness;
        self
    }

    /// Rank passages by descending relatedness to the query embedding.
    ///
    /// The sort is stable, so exactly equal scores keep original corpus
    /// order. Returns at most `top_n` entries, fewer if the corpus is
    /// smaller; fails with [`SporError::EmptyCorpus`] on an empty corpus.
    pub fn rank(&self, query_embedding: &[f32], corpus: &Corpus) -> Result<Vec<RankedPassage>> {
        if corpus.is_empty() {
            return Err(SporError::EmptyCorpus);
        }

        let mut ranked: Vec<RankedPassage> = corpus
            .passages()
            .iter()
            .map(|passage| RankedPassage {
                text: passage.text.clone(),
                score: (self.relatedness)(query_embedding, &passage.embedding),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(self.top_n);

        Ok(ranked)
    }
}

impl Default for RelatednessRanker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::EmbeddedPassage;

    fn corpus_of(embeddings: Vec<Vec<f32>>) -> Corpus {
        let passages = embeddings
            .into_iter()
            .enumerate()
            .map(|(i, e)| EmbeddedPassage::new(format!("passage {}", i), e))
            .collect();
        Corpus::new("test".to_string(), "Test".to_string(), passages).unwrap()
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_empty_corpus() {
        let corpus = corpus_of(vec![]);
        let ranker = RelatednessRanker::new();
        let result = ranker.rank(&[1.0, 0.0], &corpus);
        assert!(matches!(result, Err(SporError::EmptyCorpus)));
    }

    #[test]
    fn test_rank_descending_with_top_n() {
        let corpus = corpus_of(vec![
            vec![0.2, 0.8],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.9, 0.1],
            vec![-1.0, 0.0],
        ]);
        let ranker = RelatednessRanker::new().with_top_n(3);

        let ranked = ranker.rank(&[1.0, 0.0], &corpus).unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].text, "passage 1");
        assert!(ranked[0].score >= ranked[1].score);
        assert!(ranked[1].score >= ranked[2].score);
    }

    #[test]
    fn test_rank_ties_keep_corpus_order() {
        let corpus = corpus_of(vec![
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ]);
        let ranker = RelatednessRanker::new();

        let ranked = ranker.rank(&[0.0, 1.0], &corpus).unwrap();
        let texts: Vec<&str> = ranked.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["passage 0", "passage 1", "passage 2"]);
    }

    #[test]
    fn test_rank_returns_fewer_than_top_n() {
        let corpus = corpus_of(vec![vec![1.0], vec![0.5]]);
        let ranker = RelatednessRanker::new().with_top_n(10);
        assert_eq!(ranker.rank(&[1.0], &corpus).unwrap().len(), 2);
    }

    #[test]
    fn test_custom_relatedness_strategy() {
        fn negated(a: &[f32], b: &[f32]) -> f32 {
            -cosine_similarity(a, b)
        }

        let corpus = corpus_of(vec![vec![1.0, 0.0], vec![-1.0, 0.0]]);
        let ranker = RelatednessRanker::new().with_relatedness(negated);

        let ranked = ranker.rank(&[1.0, 0.0], &corpus).unwrap();
        assert_eq!(ranked[0].text, "passage 1");
    }
}
