//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::CorpusStore;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let summaries = orchestrator.store().list().await?;

    if summaries.is_empty() {
        Output::info("No transcripts ingested yet. Run 'spor ingest <file>' first.");
        return Ok(());
    }

    Output::header("Ingested transcripts");
    for summary in &summaries {
        Output::corpus_info(
            &summary.title,
            &summary.source_id,
            summary.passage_count,
            &summary.indexed_at.format("%Y-%m-%d").to_string(),
        );
    }

    Ok(())
}
