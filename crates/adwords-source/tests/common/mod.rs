//! In-memory collaborators for sync engine tests.
#![allow(dead_code)]

use adwords_api::{AdwordsApi, EntityPage, EntitySelector, ReportFieldDescription, ReportRequest};
use adwords_sync_source::{Clock, SyncContext};
use checkpoint::{MemoryStore, StateStore};
use chrono::{Days, NaiveDate};
use record_sink::RecordSink;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use sync_core::{RawValue, Record, Schema};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for tests
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn days_before(today: NaiveDate, n: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(n)).unwrap()
}

// ============================================================================
// Clock
// ============================================================================

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ============================================================================
// Remote API
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListReportTypes,
    DescribeReportFields {
        customer_id: String,
        report_type: String,
    },
    DownloadReport {
        customer_id: String,
        request: ReportRequest,
    },
    GetEntities {
        customer_id: String,
        service: String,
        selector: EntitySelector,
    },
}

/// Scriptable in-memory remote API that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub report_types: Vec<String>,
    pub report_fields: HashMap<String, Vec<ReportFieldDescription>>,
    /// CSV payload per day; days without an entry return `default_report`
    pub reports: HashMap<NaiveDate, String>,
    pub default_report: String,
    /// Downloads for this day and later fail
    pub fail_downloads_from: Option<NaiveDate>,
    pub fail_discovery: bool,
    /// Every entry of each entity service
    pub entities: HashMap<String, Vec<RawValue>>,
    /// Every call received, in order
    pub calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<ReportRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::DownloadReport { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn entity_selectors(&self) -> Vec<EntitySelector> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::GetEntities { selector, .. } => Some(selector),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl AdwordsApi for FakeApi {
    async fn list_report_types(&self) -> anyhow::Result<Vec<String>> {
        self.record(ApiCall::ListReportTypes);
        Ok(self.report_types.clone())
    }

    async fn describe_report_fields(
        &self,
        customer_id: &str,
        report_type: &str,
    ) -> anyhow::Result<Vec<ReportFieldDescription>> {
        self.record(ApiCall::DescribeReportFields {
            customer_id: customer_id.to_string(),
            report_type: report_type.to_string(),
        });
        if self.fail_discovery {
            anyhow::bail!("ReportDefinitionService unavailable");
        }
        self.report_fields
            .get(report_type)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown report type {report_type}"))
    }

    async fn download_report(
        &self,
        customer_id: &str,
        request: &ReportRequest,
    ) -> anyhow::Result<String> {
        self.record(ApiCall::DownloadReport {
            customer_id: customer_id.to_string(),
            request: request.clone(),
        });
        let day = request.date_range.min;
        if self.fail_downloads_from.is_some_and(|from| day >= from) {
            anyhow::bail!("connection reset while downloading {day}");
        }
        Ok(self
            .reports
            .get(&day)
            .cloned()
            .unwrap_or_else(|| self.default_report.clone()))
    }

    async fn get_entities(
        &self,
        customer_id: &str,
        service: &str,
        selector: &EntitySelector,
    ) -> anyhow::Result<EntityPage> {
        self.record(ApiCall::GetEntities {
            customer_id: customer_id.to_string(),
            service: service.to_string(),
            selector: selector.clone(),
        });
        let all = self.entities.get(service).cloned().unwrap_or_default();
        let entries = all
            .iter()
            .skip(selector.paging.start_index as usize)
            .take(selector.paging.number_results as usize)
            .cloned()
            .collect();
        Ok(EntityPage {
            entries,
            total_num_entries: all.len() as u64,
        })
    }
}

pub fn report_field(
    xml: &str,
    name: &str,
    display: &str,
    field_type: &str,
    exclusive: &[&str],
) -> ReportFieldDescription {
    ReportFieldDescription {
        xml_attribute_name: xml.to_string(),
        field_name: name.to_string(),
        display_field_name: display.to_string(),
        field_behavior: "METRIC".to_string(),
        field_type: field_type.to_string(),
        exclusive_fields: exclusive.iter().map(|s| s.to_string()).collect(),
    }
}

/// Fields shared by the report types used in tests.
pub fn standard_report_fields() -> Vec<ReportFieldDescription> {
    vec![
        report_field("day", "Date", "Day", "Date", &[]),
        report_field("clicks", "Clicks", "Clicks", "Long", &[]),
        report_field("ctr", "Ctr", "CTR", "Double", &[]),
        report_field("policy", "PolicySummary", "Policy summary", "String", &[]),
        report_field("clickType", "ClickType", "Click type", "String", &["Conversions"]),
        report_field("conversions", "Conversions", "Conversions", "Double", &["ClickType"]),
    ]
}

// ============================================================================
// Record sink
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
    Schema {
        stream: String,
        schema: Schema,
        primary_keys: Vec<String>,
    },
    Record {
        stream: String,
        record: Record,
    },
}

#[derive(Default)]
pub struct MemorySink {
    messages: Mutex<Vec<Emitted>>,
}

impl MemorySink {
    pub fn messages(&self) -> Vec<Emitted> {
        self.messages.lock().unwrap().clone()
    }

    pub fn records(&self, stream: &str) -> Vec<Record> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Emitted::Record { stream: s, record } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn schemas(&self) -> Vec<(String, Schema, Vec<String>)> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Emitted::Schema {
                    stream,
                    schema,
                    primary_keys,
                } => Some((stream, schema, primary_keys)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl RecordSink for MemorySink {
    async fn write_schema(
        &self,
        stream: &str,
        schema: &Schema,
        primary_keys: &[String],
    ) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(Emitted::Schema {
            stream: stream.to_string(),
            schema: schema.clone(),
            primary_keys: primary_keys.to_vec(),
        });
        Ok(())
    }

    async fn write_record(&self, stream: &str, record: &Record) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(Emitted::Record {
            stream: stream.to_string(),
            record: record.clone(),
        });
        Ok(())
    }
}

// ============================================================================
// Context
// ============================================================================

pub struct Harness {
    pub ctx: SyncContext,
    pub transport: Arc<MemoryStore>,
}

pub fn harness(customer_ids: &[&str], start_date: NaiveDate, today: NaiveDate) -> Harness {
    let transport = Arc::new(MemoryStore::new());
    let state = StateStore::new(start_date, transport.clone());
    let ctx = SyncContext::new(
        customer_ids.iter().map(|s| s.to_string()).collect(),
        state,
        Arc::new(FixedClock(today)),
    );
    Harness { ctx, transport }
}

/// Catalog JSON with one stream, selecting the named properties.
pub fn catalog_json(stream: &str, selected: &[&str]) -> String {
    let properties: Vec<String> = selected
        .iter()
        .map(|name| format!(r#""{name}": {{"selected": true}}"#))
        .collect();
    format!(
        r#"{{"streams": [{{"stream": "{stream}", "tap_stream_id": "{stream}", "schema": {{"type": "object", "selected": true, "properties": {{{}}}}}}}]}}"#,
        properties.join(", ")
    )
}
