mod categories;
mod eco;
mod jsonl;
mod score;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(about = "Catalog record enrichment: category taxonomy sync and eco scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sync each record's hierarchical categories into the search index.
    Categories {
        /// JSON Lines file of records; stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Attach model-inferred `eco_details` to each record.
    Eco {
        /// JSON Lines file of records; stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Where to write enriched records; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Score one eco-attributes JSON object offline and print the breakdown.
    Score {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

impl Commands {
    /// Whether the command talks to a remote service and so needs the
    /// runner settings. Offline scoring must work even when those are invalid.
    fn needs_runtime_config(&self) -> bool {
        !matches!(self, Commands::Score { .. })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let runtime = if cli.command.needs_runtime_config() {
        Some(catalog_core::load_runtime_config_from_env()?)
    } else {
        None
    };
    init_tracing(runtime.as_ref().map_or(DEFAULT_LOG_LEVEL, |r| r.log_level.as_str()))?;

    match (cli.command, runtime) {
        (Commands::Score { input }, _) => score::run_score(input.as_deref()).await?,
        (Commands::Categories { input }, Some(runtime)) => {
            let config = catalog_core::load_index_config_from_env()?;
            categories::run_categories(&runtime, &config, input.as_deref()).await?;
        }
        (Commands::Eco { input, output }, Some(runtime)) => {
            let config = catalog_core::load_vision_config_from_env()?;
            eco::run_eco(&runtime, &config, input.as_deref(), output.as_deref()).await?;
        }
        (Commands::Categories { .. } | Commands::Eco { .. }, None) => {
            anyhow::bail!("runner settings were not loaded");
        }
    }

    Ok(())
}

const DEFAULT_LOG_LEVEL: &str = "info";

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    // stdout carries records, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();
    Ok(())
}
