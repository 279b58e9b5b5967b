//! Request and response types exchanged with the remote API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sync_core::RawValue;

/// One field of a report type, as described by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFieldDescription {
    /// Property name used in schemas and records (`clicks`)
    pub xml_attribute_name: String,
    /// Name used in report requests (`Clicks`)
    pub field_name: String,
    /// Column header in tabular downloads (`Clicks`)
    pub display_field_name: String,
    /// `ATTRIBUTE`, `METRIC` or `SEGMENT`
    pub field_behavior: String,
    /// Remote type tag (`Long`, `Double`, `Date`, ...)
    pub field_type: String,
    /// Remote field names that cannot be requested together with this one
    #[serde(default)]
    pub exclusive_fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DownloadFormat {
    #[default]
    Csv,
}

impl DownloadFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadFormat::Csv => "CSV",
        }
    }
}

/// Inclusive date range of a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateRange {
    pub fn single_day(day: NaiveDate) -> Self {
        Self { min: day, max: day }
    }
}

/// Shape of the downloaded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
    pub skip_report_header: bool,
    pub skip_column_header: bool,
    pub skip_report_summary: bool,
    pub include_zero_impressions: bool,
}

impl Default for DownloadOptions {
    /// Column header only; rows with zero impressions excluded, since some
    /// report types reject them.
    fn default() -> Self {
        Self {
            skip_report_header: true,
            skip_column_header: false,
            skip_report_summary: true,
            include_zero_impressions: false,
        }
    }
}

/// A report download request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report_type: String,
    pub download_format: DownloadFormat,
    pub date_range: DateRange,
    /// Remote field names, in request order
    pub fields: Vec<String>,
    pub options: DownloadOptions,
}

impl ReportRequest {
    /// A CSV request for a single day.
    pub fn single_day(report_type: impl Into<String>, day: NaiveDate, fields: Vec<String>) -> Self {
        Self {
            report_type: report_type.into(),
            download_format: DownloadFormat::Csv,
            date_range: DateRange::single_day(day),
            fields,
            options: DownloadOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub start_index: u64,
    pub number_results: u64,
}

/// Selector for a generic entity `get` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySelector {
    /// Remote field names, in wire casing
    pub fields: Vec<String>,
    pub paging: Paging,
}

/// One page of a generic entity listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPage {
    pub entries: Vec<RawValue>,
    pub total_num_entries: u64,
}
