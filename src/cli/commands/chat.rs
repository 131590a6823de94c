//! Chat command implementation.
//!
//! The ask-forever loop lives here; the engine itself is single-call.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::AskEngine;
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Run the interactive chat loop.
pub async fn run_chat(source: &str, model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings.clone())?;
    let corpus = orchestrator.load_corpus(source).await?;
    let model = model.unwrap_or_else(|| settings.ask.model.clone());

    Output::info(&format!(
        "Asking about '{}' ({} passages). Empty line or Ctrl-D to quit.",
        corpus.title(),
        corpus.len()
    ));

    let engine = AskEngine::new(corpus, orchestrator.embedder(), &model, settings.ask.token_budget)
        .with_prompts(orchestrator.prompts().clone())
        .with_top_n(settings.ranking.top_n)
        .with_temperature(settings.ask.temperature);

    let stdin = io::stdin();
    loop {
        print!("Ask a question: ");
        io::stdout().flush()?;

        let mut question = String::new();
        if stdin.lock().read_line(&mut question)? == 0 {
            break; // EOF
        }
        let question = question.trim();
        if question.is_empty() {
            break;
        }

        let spinner = Output::spinner("Thinking...");
        match engine.ask(question).await {
            Ok(response) => {
                spinner.finish_and_clear();
                println!("\n{}\n", response.answer);
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("Failed to generate answer: {}", e));
            }
        }
    }

    Ok(())
}
