//! Headline application binary - composition root.
//!
//! 1. Load configuration from TOML
//! 2. Open the delivered-state store
//! 3. Build sources, scorer and ranker into a pipeline
//! 4. Run the requested command and print JSON on stdout
//!
//! Logs go to stderr so stdout stays machine-readable.

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use headline_core::{Document, HeadlineConfig};
use headline_rank::{DocumentSource, JsonFileSource, Pipeline, Ranker};
use headline_score::RelevanceScorer;
use headline_storage::{open_store, DeliveredStore, MemoryDeliveredStore};
use headline_text::final_dedup;

use cli::{CliArgs, Command};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn build_sources(inputs: &[PathBuf]) -> Vec<Arc<dyn DocumentSource>> {
    inputs
        .iter()
        .map(|path| Arc::new(JsonFileSource::from_path(path.clone())) as Arc<dyn DocumentSource>)
        .collect()
}

fn build_scorer(config: &HeadlineConfig, no_social: bool) -> AppResult<RelevanceScorer> {
    if no_social || !config.social.enabled {
        tracing::info!("Social enrichment disabled");
        return Ok(RelevanceScorer::offline());
    }
    Ok(RelevanceScorer::from_config(&config.social)?)
}

fn build_ranker(config: &HeadlineConfig, store: Arc<dyn DeliveredStore>) -> Ranker {
    Ranker::new(store)
        .with_max_per_source(config.ranking.max_per_source)
        .with_retention_hours(config.ranking.retention_hours)
}

fn print_json(items: &[Document]) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(items)?);
    Ok(())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = CliArgs::parse();
    let config_path = args.resolve_config_path();

    // The log level may come from the file, so peek at it before logging is up.
    let config_level = HeadlineConfig::load(&config_path)
        .map(|c| c.general.log_level)
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&args.resolve_log_level(&config_level));

    tracing::info!("Starting Headline v{}", env!("CARGO_PKG_VERSION"));
    let config = HeadlineConfig::load_or_default(&config_path);

    match args.command {
        Command::Rank {
            ref inputs,
            max_items,
            max_age_hours,
            no_social,
        } => {
            let data_dir = args.resolve_data_dir(&config.general.data_dir);
            let store: Arc<dyn DeliveredStore> = Arc::from(open_store(&config.storage, &data_dir)?);
            let pipeline = Pipeline::with_config(
                build_sources(inputs),
                build_scorer(&config, no_social)?,
                build_ranker(&config, store),
                &config.pipeline,
            );
            let items = pipeline
                .run(
                    max_items.unwrap_or(config.ranking.max_items),
                    max_age_hours.unwrap_or(config.ranking.max_age_hours),
                )
                .await?;
            print_json(&items)?;
        }
        Command::Top {
            ref inputs,
            max_items,
            no_social,
        } => {
            // Read-only: delivered state is never consulted here.
            let pipeline = Pipeline::with_config(
                build_sources(inputs),
                build_scorer(&config, no_social)?,
                build_ranker(&config, Arc::new(MemoryDeliveredStore::new())),
                &config.pipeline,
            );
            let items = pipeline
                .top_of_day(max_items.unwrap_or(config.ranking.max_items))
                .await?;
            print_json(&items)?;
        }
        Command::Dedup { ref input } => {
            let items = JsonFileSource::from_path(input.clone()).fetch().await?;
            let before = items.len();
            let kept = final_dedup(items);
            tracing::info!(before, after = kept.len(), "Dedup complete");
            print_json(&kept)?;
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
