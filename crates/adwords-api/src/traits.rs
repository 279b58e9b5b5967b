//! AdwordsApi trait definition.

use anyhow::Result;

use crate::types::{EntityPage, EntitySelector, ReportFieldDescription, ReportRequest};

/// Trait for the remote advertising API.
///
/// Every call is scoped to one customer account except report type
/// enumeration, which is account-independent. Implementations own
/// authentication and transport concerns; errors are returned as-is with
/// no retry at this layer.
#[async_trait::async_trait]
pub trait AdwordsApi: Send + Sync {
    /// Enumerate every report type the service declares.
    async fn list_report_types(&self) -> Result<Vec<String>>;

    /// Describe the fields of one report type.
    async fn describe_report_fields(
        &self,
        customer_id: &str,
        report_type: &str,
    ) -> Result<Vec<ReportFieldDescription>>;

    /// Download a report as tabular text (header row, then data rows).
    async fn download_report(&self, customer_id: &str, request: &ReportRequest) -> Result<String>;

    /// Fetch one page of a generic entity listing from the named service.
    async fn get_entities(
        &self,
        customer_id: &str,
        service: &str,
        selector: &EntitySelector,
    ) -> Result<EntityPage>;
}
