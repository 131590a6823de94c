//! Question answering over an embedded corpus.

use super::{BudgetAssembler, RelatednessRanker};
use crate::config::Prompts;
use crate::corpus::Corpus;
use crate::embedding::Embedder;
use crate::error::{Result, SporError};
use crate::openai::create_client;
use crate::tokenizer::Tokenizer;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Builds grounded prompts and answers questions against one corpus.
///
/// Holds the corpus read-only for the session; every call is independent,
/// so the engine can be invoked repeatedly with different questions.
pub struct AskEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    token_budget: usize,
    corpus: Corpus,
    embedder: Arc<dyn Embedder>,
    ranker: RelatednessRanker,
    prompts: Prompts,
}

impl AskEngine {
    /// Create an engine for a corpus.
    pub fn new(corpus: Corpus, embedder: Arc<dyn Embedder>, model: &str, token_budget: usize) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            temperature: 0.0,
            token_budget,
            corpus,
            embedder,
            ranker: RelatednessRanker::new(),
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Cap the number of ranked passages considered per question.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.ranker = RelatednessRanker::new().with_top_n(top_n);
        self
    }

    /// Set the answer sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build a grounded prompt for a question without calling the
    /// completion model.
    ///
    /// Sequences the core pipeline: embed the question (external call),
    /// rank the corpus passages against it, then pack the best passages
    /// into the token budget.
    pub async fn build_prompt(&self, question: &str) -> Result<String> {
        let tokenizer = Tokenizer::for_model(&self.model)?;

        let query_embedding = self.embedder.embed(question).await?;
        let ranked = self.ranker.rank(&query_embedding, &self.corpus)?;

        debug!("Ranked {} passages for question", ranked.len());

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());

        let header = self
            .prompts
            .render_with_custom(&self.prompts.ask.introduction, &vars);
        let footer = self
            .prompts
            .render_with_custom(&self.prompts.ask.question, &vars);

        let assembler = BudgetAssembler::new(&tokenizer, self.token_budget);
        Ok(assembler.assemble(&ranked, &header, &footer))
    }

    /// Ask a question and get an answer grounded in the corpus.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        info!("Processing question: {}", question);

        let prompt = self.build_prompt(question).await?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.ask.system.clone())
                .build()
                .map_err(|e| SporError::Prompt(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.clone())
                .build()
                .map_err(|e| SporError::Prompt(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| SporError::Prompt(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SporError::OpenAI(format!("Failed to generate answer: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SporError::Prompt("Empty response from LLM".to_string()))?
            .clone();

        Ok(AskResponse { answer, prompt })
    }

    /// The corpus this engine answers from.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }
}

/// An answer together with the prompt that produced it.
#[derive(Debug, Clone)]
pub struct AskResponse {
    /// The generated answer.
    pub answer: String,
    /// The assembled prompt sent as the user message.
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::EmbeddedPassage;
    use async_trait::async_trait;

    /// Deterministic embedder: maps known phrases onto fixed axes.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("music") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
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

    fn corpus() -> Corpus {
        Corpus::new(
            "ep1".to_string(),
            "Episode 1".to_string(),
            vec![
                EmbeddedPassage::new(
                    "The guest talked about recording music in analog studios.".to_string(),
                    vec![1.0, 0.0],
                ),
                EmbeddedPassage::new(
                    "They closed with travel recommendations for Lisbon.".to_string(),
                    vec![0.0, 1.0],
                ),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_prompt_grounds_on_most_related_passage() {
        let engine = AskEngine::new(corpus(), Arc::new(StubEmbedder), "gpt-3.5-turbo", 3596);

        let prompt = engine
            .build_prompt("What did they say about music?")
            .await
            .unwrap();

        assert!(prompt.contains("podcast analyst"));
        assert!(prompt.contains("analog studios"));
        assert!(prompt.ends_with("Question: What did they say about music?"));

        // Highest-ranked passage comes first in the prompt.
        let music_pos = prompt.find("analog studios").unwrap();
        let lisbon_pos = prompt.find("Lisbon").unwrap();
        assert!(music_pos < lisbon_pos);
    }

    #[tokio::test]
    async fn test_build_prompt_respects_budget() {
        let engine = AskEngine::new(corpus(), Arc::new(StubEmbedder), "gpt-3.5-turbo", 150);
        let tokenizer = Tokenizer::for_model("gpt-3.5-turbo").unwrap();

        let prompt = engine.build_prompt("Anything about music?").await.unwrap();
        assert!(tokenizer.count(&prompt) <= 150);
    }

    #[tokio::test]
    async fn test_build_prompt_empty_corpus_errors() {
        let empty = Corpus::new("ep0".to_string(), "Empty".to_string(), vec![]).unwrap();
        let engine = AskEngine::new(empty, Arc::new(StubEmbedder), "gpt-3.5-turbo", 3596);

        let result = engine.build_prompt("anything?").await;
        assert!(matches!(result, Err(SporError::EmptyCorpus)));
    }
}
