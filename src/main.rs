//! Spor CLI entry point.

use anyhow::Result;
use clap::Parser;
use spor::cli::{commands, Cli, Commands};
use spor::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("spor={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Ingest {
            file,
            force,
            max_tokens,
        } => {
            commands::run_ingest(file, *force, *max_tokens, settings).await?;
        }

        Commands::Ask {
            question,
            source,
            model,
            top_n,
            budget,
            show_prompt,
        } => {
            commands::run_ask(
                question,
                source,
                model.clone(),
                *top_n,
                *budget,
                *show_prompt,
                settings,
            )
            .await?;
        }

        Commands::Chat { source, model } => {
            commands::run_chat(source, model.clone(), settings).await?;
        }

        Commands::List => {
            commands::run_list(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
