//! Mutual-exclusion rules between report fields.

use adwords_api::{AdwordsApi, ReportFieldDescription};
use std::collections::{HashMap, HashSet};

use crate::error::{Result, SyncError};

/// Describe every selected field that conflicts with another selected one.
///
/// `selected` holds remote field names. Each violation reads
/// `<property> cannot be selected with <property>,<property>`.
pub fn find_exclusion_violations(
    fields: &[ReportFieldDescription],
    selected: &[String],
) -> Vec<String> {
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let property_names: HashMap<&str, &str> = fields
        .iter()
        .map(|f| (f.field_name.as_str(), f.xml_attribute_name.as_str()))
        .collect();

    fields
        .iter()
        .filter(|field| selected.contains(field.field_name.as_str()))
        .filter_map(|field| {
            let conflicts: Vec<&str> = field
                .exclusive_fields
                .iter()
                .map(String::as_str)
                .filter(|ex| selected.contains(ex))
                .map(|ex| property_names.get(ex).copied().unwrap_or(ex))
                .collect();
            (!conflicts.is_empty()).then(|| {
                format!(
                    "{} cannot be selected with {}",
                    field.xml_attribute_name,
                    conflicts.join(",")
                )
            })
        })
        .collect()
}

/// Reject a report field selection that breaks the remote exclusion rules.
///
/// Runs before any download so the operator sees every conflict at once.
pub async fn check_selected_fields<A: AdwordsApi>(
    api: &A,
    customer_id: &str,
    stream: &str,
    field_list: &[String],
) -> Result<()> {
    let fields = api
        .describe_report_fields(customer_id, stream)
        .await
        .map_err(|source| SyncError::Discovery {
            stream: stream.to_string(),
            source,
        })?;

    let violations = find_exclusion_violations(&fields, field_list);
    if violations.is_empty() {
        return Ok(());
    }

    Err(SyncError::Validation {
        stream: stream.to_string(),
        message: format!(
            "Fields selection violates Google's exclusion rules:\n\t{}",
            violations.join("\n\t")
        ),
    })
}
