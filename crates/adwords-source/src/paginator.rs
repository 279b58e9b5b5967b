//! Offset-paginated entity listings.
//!
//! Entity streams have no cursor: every run fetches every page.

use adwords_api::{AdwordsApi, EntitySelector, Paging};
use adwords_types::transform_record;
use record_sink::RecordSink;
use sync_core::Schema;
use tracing::info;

use crate::catalog::{entity_endpoint, CUSTOMER_ID};
use crate::error::{Result, SyncError};
use crate::selector::{fields_to_sync, filter_fields_by_stream, wire_field_name};

pub const PAGE_SIZE: u64 = 100;

/// Sync one entity stream for one account.
pub async fn sync_entity_stream<A: AdwordsApi, S: RecordSink>(
    api: &A,
    sink: &S,
    customer_id: &str,
    stream: &str,
    annotated: &Schema,
) -> Result<()> {
    let endpoint = entity_endpoint(stream).ok_or_else(|| {
        SyncError::Configuration(format!("Unrecognized generic stream name: {stream}"))
    })?;
    let discovered = endpoint.stream()?;

    sink.write_schema(
        stream,
        &discovered.schema.without_inclusion(),
        &discovered.primary_keys,
    )
    .await
    .map_err(SyncError::Output)?;

    info!("Syncing {stream}");
    let field_list = fields_to_sync(&discovered.schema, annotated);
    info!("Request fields: {field_list:?}");
    let field_list = filter_fields_by_stream(stream, field_list)?;
    info!("Filtered fields: {field_list:?}");

    let wire_fields: Vec<String> = field_list
        .iter()
        .filter(|f| f.as_str() != CUSTOMER_ID)
        .map(|f| wire_field_name(f))
        .collect();

    let mut offset = 0;
    loop {
        let selector = EntitySelector {
            fields: wire_fields.clone(),
            paging: Paging {
                start_index: offset,
                number_results: PAGE_SIZE,
            },
        };
        let page = api
            .get_entities(customer_id, endpoint.service, &selector)
            .await
            .map_err(SyncError::Transport)?;

        for entry in &page.entries {
            let mut record = transform_record(entry, &discovered.schema);
            record.insert(CUSTOMER_ID, serde_json::Value::from(customer_id));
            sink.write_record(stream, &record)
                .await
                .map_err(SyncError::Output)?;
        }

        offset += PAGE_SIZE;
        if offset >= page.total_num_entries {
            break;
        }
    }

    info!("Done syncing {stream} for customer_id {customer_id}");
    Ok(())
}
