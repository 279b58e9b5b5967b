//! Top-level orchestration of discovery and sync runs.

use adwords_api::AdwordsApi;
use record_sink::RecordSink;
use sync_core::{Catalog, Schema, StreamKind};
use tracing::info;

use crate::catalog::{classify, discover_catalog};
use crate::context::SyncContext;
use crate::error::{Result, SyncError};
use crate::paginator::sync_entity_stream;
use crate::report::sync_report;

/// A stream the operator selected, with its kind resolved.
#[derive(Debug, Clone)]
pub struct SelectedStream {
    pub name: String,
    pub kind: StreamKind,
    pub annotated: Schema,
}

/// Pick the selected streams out of an annotated catalog, in catalog order.
///
/// The kind recorded at discovery is used as is; entries without one are
/// classified by name.
pub fn resolve_selection(catalog: &Catalog) -> Vec<SelectedStream> {
    catalog
        .streams
        .iter()
        .filter_map(|entry| {
            if entry.schema.is_selected() {
                Some(SelectedStream {
                    name: entry.stream.clone(),
                    kind: entry
                        .stream_kind
                        .unwrap_or_else(|| classify(&entry.stream)),
                    annotated: entry.schema.clone(),
                })
            } else {
                info!("Skipping stream {}.", entry.stream);
                None
            }
        })
        .collect()
}

/// Build the discovery document using the first account's credentials.
pub async fn run_discover<A: AdwordsApi>(api: &A, customer_ids: &[String]) -> Result<Catalog> {
    let customer_id = customer_ids
        .first()
        .ok_or_else(|| SyncError::Configuration("No customer IDs configured".to_string()))?;

    let catalog = discover_catalog(api, customer_id).await?;
    info!("Discovery complete");
    Ok(catalog)
}

/// Sync every selected stream for every account.
///
/// State is flushed once more on the way out, whether or not the sync
/// succeeded. A sync error takes precedence over a flush error.
pub async fn run_sync<A: AdwordsApi, S: RecordSink>(
    api: &A,
    sink: &S,
    ctx: &mut SyncContext,
    catalog: &Catalog,
) -> Result<()> {
    let selection = resolve_selection(catalog);
    if selection.is_empty() {
        info!("No streams were selected");
    }

    let result = sync_all_customers(api, sink, ctx, &selection).await;
    let flushed = ctx.state.flush().await.map_err(SyncError::Output);

    result.and(flushed)?;
    info!("Sync completed");
    Ok(())
}

async fn sync_all_customers<A: AdwordsApi, S: RecordSink>(
    api: &A,
    sink: &S,
    ctx: &mut SyncContext,
    selection: &[SelectedStream],
) -> Result<()> {
    let customer_ids = ctx.customer_ids.clone();
    for customer_id in &customer_ids {
        info!("Syncing customer ID {customer_id} ...");
        for stream in selection {
            info!("Syncing stream {} ...", stream.name);
            match stream.kind {
                StreamKind::Entity => {
                    sync_entity_stream(api, sink, customer_id, &stream.name, &stream.annotated)
                        .await?
                }
                StreamKind::Report => {
                    sync_report(api, sink, ctx, customer_id, &stream.name, &stream.annotated)
                        .await?
                }
            }
        }
        info!("Done syncing customer ID {customer_id}.");
    }
    Ok(())
}
