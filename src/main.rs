//! Command-line interface for adwords-sync
//!
//! ```bash
//! adwords-sync discover --config config.json > catalog.json
//! adwords-sync sync --config config.json --catalog catalog.json \
//!   --state state.json --state-file checkpoints/state.json
//! ```
//!
//! Messages go to stdout; logs go to stderr (`RUST_LOG` controls the level).

use adwords_sync::{discover, sync, Config, MessageWriter, SyncOptions};
use adwords_sync_http::HttpAdwordsApi;
use adwords_sync_source::SystemClock;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "adwords-sync")]
#[command(about = "Extract advertising-account reports and entities")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover available streams and print the catalog
    Discover {
        /// Path to the JSON config file
        #[arg(long, env = "ADWORDS_SYNC_CONFIG")]
        config: PathBuf,
    },

    /// Sync the streams selected in a catalog
    Sync {
        /// Path to the JSON config file
        #[arg(long, env = "ADWORDS_SYNC_CONFIG")]
        config: PathBuf,

        /// Path to the annotated catalog
        #[arg(long)]
        catalog: PathBuf,

        /// State document from a previous run
        #[arg(long)]
        state: Option<PathBuf>,

        /// Persist state to this file instead of emitting STATE messages
        #[arg(long)]
        state_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // stdout carries the message stream
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Discover { config } => {
            let config = Config::from_file(&config)?;
            let api = HttpAdwordsApi::new(config.http_config())?;
            discover(&api, &config, &mut std::io::stdout().lock()).await?;
        }
        Commands::Sync {
            config,
            catalog,
            state,
            state_file,
        } => {
            let config = Config::from_file(&config)?;
            let api = HttpAdwordsApi::new(config.http_config())?;
            let options = SyncOptions {
                catalog,
                state,
                state_file,
            };
            sync(
                &api,
                &config,
                &options,
                Arc::new(MessageWriter::stdout()),
                Arc::new(SystemClock),
            )
            .await?;
        }
    }

    Ok(())
}
