//! The `discover` and `sync` commands.

use crate::config::Config;
use crate::output::MessageWriter;
use adwords_api::AdwordsApi;
use adwords_sync_source::{run_discover, run_sync, Clock, SyncContext};
use anyhow::Context;
use checkpoint::{CheckpointStore, FilesystemStore, StateSnapshot, StateStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sync_core::Catalog;
use tracing::info;

/// Discover every available stream and write the catalog document.
pub async fn discover<A: AdwordsApi, W: Write>(
    api: &A,
    config: &Config,
    out: &mut W,
) -> anyhow::Result<()> {
    let catalog = run_discover(api, &config.customer_ids).await?;
    serde_json::to_writer_pretty(&mut *out, &catalog).context("Failed to write catalog")?;
    writeln!(out).context("Failed to write catalog")?;
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Annotated catalog selecting streams and fields
    pub catalog: PathBuf,
    /// State document seeding report cursors
    pub state: Option<PathBuf>,
    /// Checkpoint state to this file instead of the output stream
    pub state_file: Option<PathBuf>,
}

fn read_state(path: &Path) -> anyhow::Result<StateSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state from {path:?}"))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid state document {path:?}"))
}

/// Sync the selected streams of the catalog for every configured account.
pub async fn sync<A, W>(
    api: &A,
    config: &Config,
    options: &SyncOptions,
    writer: Arc<MessageWriter<W>>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<()>
where
    A: AdwordsApi,
    W: Write + Send + 'static,
{
    let catalog = Catalog::from_file(&options.catalog)
        .with_context(|| format!("Failed to load catalog from {:?}", options.catalog))?;

    let transport: Arc<dyn CheckpointStore> = match &options.state_file {
        Some(path) => {
            info!("Checkpointing state to {path:?}");
            Arc::new(FilesystemStore::new(path.clone()))
        }
        None => writer.clone(),
    };

    let state = StateStore::new(config.start_date, transport);
    let state = match &options.state {
        Some(path) => state.with_snapshot(&read_state(path)?)?,
        None => state.restore().await?,
    };

    let mut ctx = SyncContext::new(config.customer_ids.clone(), state, clock);
    run_sync(api, writer.as_ref(), &mut ctx, &catalog).await?;
    Ok(())
}
