//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::AskEngine;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    source: &str,
    model: Option<String>,
    top_n: Option<usize>,
    budget: Option<usize>,
    show_prompt: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings.clone())?;
    let corpus = orchestrator.load_corpus(source).await?;

    let model = model.unwrap_or_else(|| settings.ask.model.clone());
    let budget = budget.unwrap_or(settings.ask.token_budget);
    let top_n = top_n.unwrap_or(settings.ranking.top_n);

    let engine = AskEngine::new(corpus, orchestrator.embedder(), &model, budget)
        .with_prompts(orchestrator.prompts().clone())
        .with_top_n(top_n)
        .with_temperature(settings.ask.temperature);

    let spinner = Output::spinner("Searching transcript...");

    match engine.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            if show_prompt {
                Output::header("Prompt");
                println!("{}", response.prompt);
            }

            println!("\n{}\n", response.answer);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
