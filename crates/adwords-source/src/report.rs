//! Day-windowed report extraction.
//!
//! Each report stream is synced one day at a time from its resume point up
//! to today. A day's rows are all emitted before its cursor is stored and
//! flushed, so an interrupted run re-emits at most one day.

use adwords_api::{AdwordsApi, ReportRequest};
use adwords_types::transform_record;
use checkpoint::{Cursor, StateStore};
use chrono::{Days, NaiveDate};
use record_sink::RecordSink;
use std::collections::{BTreeMap, HashMap};
use sync_core::{RawValue, Schema};
use tracing::{debug, info, warn};

use crate::catalog::{
    create_schema_for_report, is_bounded_lookback, CUSTOMER_ID, LOOKBACK_DAYS,
    REPORT_PRIMARY_KEYS, ROW_ID,
};
use crate::context::SyncContext;
use crate::error::{Result, SyncError};
use crate::exclusion::check_selected_fields;
use crate::selector::fields_to_sync;

/// Column header whose display label matches no field description.
const AD_POLICIES_HEADER: &str = "Ad policies";
const AD_POLICIES_FIELD: &str = "policy";

/// Sync one report stream for one account.
pub async fn sync_report<A: AdwordsApi, S: RecordSink>(
    api: &A,
    sink: &S,
    ctx: &mut SyncContext,
    customer_id: &str,
    stream: &str,
    annotated: &Schema,
) -> Result<()> {
    let schema = create_schema_for_report(api, customer_id, stream).await?;
    let selected = fields_to_sync(&schema, annotated);
    let field_list = remote_field_list(&schema, &selected);

    check_selected_fields(api, customer_id, stream, &field_list).await?;

    let primary_keys: Vec<String> = REPORT_PRIMARY_KEYS.iter().map(|k| k.to_string()).collect();
    info!("{stream} primary keys are {primary_keys:?}");
    sink.write_schema(stream, &schema.without_inclusion(), &primary_keys)
        .await
        .map_err(SyncError::Output)?;

    info!("Selected fields: {field_list:?}");

    let mut day = first_day(&ctx.state, customer_id, stream, ctx.today());
    while day <= ctx.today() {
        sync_report_for_day(api, sink, customer_id, stream, &schema, &field_list, day).await?;

        ctx.state.set(customer_id, stream, Cursor::new(day));
        ctx.state.flush().await.map_err(SyncError::Output)?;

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    info!("Done syncing the {stream} report for customer_id {customer_id}");
    Ok(())
}

/// The first day a run requests for a report stream.
///
/// The stored cursor day, or the configured start date when no cursor
/// exists; for bounded-lookback reports, never earlier than
/// `today - 90 days`. The cursor day itself is fetched again.
pub fn first_day(state: &StateStore, customer_id: &str, stream: &str, today: NaiveDate) -> NaiveDate {
    let day = state.get(customer_id, stream);

    if !is_bounded_lookback(stream) {
        return day;
    }

    let cutoff = today
        .checked_sub_days(Days::new(LOOKBACK_DAYS))
        .unwrap_or(NaiveDate::MIN);
    if day < cutoff {
        debug!("Clamping {stream} start from {day} to {cutoff}");
        cutoff
    } else {
        day
    }
}

/// Remote names of the selected properties. Synthetic properties are
/// never requested.
fn remote_field_list(schema: &Schema, selected: &[String]) -> Vec<String> {
    selected
        .iter()
        .filter(|name| name.as_str() != CUSTOMER_ID && name.as_str() != ROW_ID)
        .filter_map(|name| {
            schema
                .property(name)
                .map(|p| p.field.clone().unwrap_or_else(|| name.clone()))
        })
        .collect()
}

async fn sync_report_for_day<A: AdwordsApi, S: RecordSink>(
    api: &A,
    sink: &S,
    customer_id: &str,
    stream: &str,
    schema: &Schema,
    field_list: &[String],
    day: NaiveDate,
) -> Result<usize> {
    let request = ReportRequest::single_day(stream, day, field_list.to_vec());
    let payload = api
        .download_report(customer_id, &request)
        .await
        .map_err(SyncError::Transport)?;

    let (headers, rows) = parse_report_csv(&payload)?;
    let columns = map_headers(schema, &headers);

    for (ordinal, row) in rows.iter().enumerate() {
        let mut raw: BTreeMap<String, RawValue> = columns
            .iter()
            .zip(row.iter())
            .filter_map(|(column, value)| {
                column
                    .as_ref()
                    .map(|name| (name.clone(), RawValue::scalar(value)))
            })
            .collect();
        raw.insert(CUSTOMER_ID.to_string(), RawValue::scalar(customer_id));

        let mut record = transform_record(&RawValue::Mapping(raw), schema);
        record.insert(ROW_ID, serde_json::Value::from(ordinal));

        sink.write_record(stream, &record)
            .await
            .map_err(SyncError::Output)?;
    }

    info!(
        "Done syncing {} records for the {stream} report for customer_id {customer_id} on {day}",
        rows.len()
    );
    Ok(rows.len())
}

/// Split a downloaded report into its header row and data rows.
pub fn parse_report_csv(payload: &str) -> Result<(Vec<String>, Vec<csv::StringRecord>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(payload.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SyncError::Transport(anyhow::anyhow!("Failed to read report headers: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| SyncError::Transport(anyhow::anyhow!("Failed to read report rows: {e}")))?;

    Ok((headers, rows))
}

/// Map column headers (display labels) back to property names.
///
/// Columns with no matching property are skipped with a warning.
pub fn map_headers(schema: &Schema, headers: &[String]) -> Vec<Option<String>> {
    let mut by_description: HashMap<&str, &str> = schema
        .properties
        .iter()
        .flat_map(|properties| properties.iter())
        .filter_map(|(name, property)| property.description.as_deref().map(|d| (d, name)))
        .collect();
    by_description.insert(AD_POLICIES_HEADER, AD_POLICIES_FIELD);

    headers
        .iter()
        .map(|header| match by_description.get(header.as_str()) {
            Some(name) => Some(name.to_string()),
            None => {
                warn!("Report column '{header}' matches no known field; skipping it");
                None
            }
        })
        .collect()
}
