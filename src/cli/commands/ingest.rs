//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::Path;

/// Run the ingest command.
pub async fn run_ingest(
    file: &str,
    force: bool,
    max_tokens: Option<usize>,
    mut settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ingest) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let path = Path::new(file);
    if !path.exists() {
        Output::error(&format!("Transcript file not found: {}", file));
        anyhow::bail!("file not found: {}", file);
    }

    if let Some(max_tokens) = max_tokens {
        settings.splitting.max_tokens = max_tokens;
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Splitting, embedding, and indexing...");
    match orchestrator.ingest_transcript(path, force).await {
        Ok(result) if result.skipped => {
            spinner.finish_and_clear();
            Output::info(&format!(
                "'{}' is already indexed. Use --force to re-ingest.",
                result.source_id
            ));
        }
        Ok(result) => {
            spinner.finish_and_clear();
            Output::success(&format!(
                "Indexed {} passages for '{}'",
                result.passages_indexed, result.source_id
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Ingestion failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
