use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use tripdata_core::{DestinationRecord, DestinationType, SearchFilters, ServiceConfig, SledStore};
use tripdata_indexer::{build_service, ingest};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Fetch, cache and search destination data", long_about = None)]
struct Cli {
    /// Store directory
    #[arg(long, default_value = "./data/store")]
    store: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get destinations for a query, from cache or the live API
    Fetch {
        #[arg(long)]
        query: String,
    },
    /// Keyword search over stored destinations
    Search {
        #[arg(long)]
        query: String,
        /// Allowed destination types (repeatable)
        #[arg(long = "type")]
        kinds: Vec<DestinationType>,
        /// Required tags, any of (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long)]
        max_budget: Option<u32>,
    },
    /// Counts of stored destinations and query caches
    Stats,
    /// Store destination records from a JSON/JSONL file or directory
    Seed {
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let config = ServiceConfig::load()?;
    let store = SledStore::open(&cli.store)?;
    let service = build_service(&config, Arc::new(store.clone()))?;

    match cli.command {
        Commands::Fetch { query } => print_json(&service.get_destination_data(&query).await)?,
        Commands::Search { query, kinds, tags, min_rating, max_budget } => {
            let filters = SearchFilters {
                kinds: (!kinds.is_empty()).then_some(kinds),
                tags: (!tags.is_empty()).then_some(tags),
                min_rating,
                max_budget,
            };
            print_json(&service.search_stored_destinations(&query, &filters).await)?
        }
        Commands::Stats => print_json(&service.get_storage_stats().await)?,
        Commands::Seed { input } => {
            let records: Vec<DestinationRecord> = ingest::load_documents(&input)?;
            let stored = service.store_destinations(&records).await?;
            tracing::info!(stored, input = %input.display(), "seed complete");
        }
    }

    store.flush().await?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
