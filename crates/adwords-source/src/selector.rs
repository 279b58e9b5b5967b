//! Field selection: which properties of a stream are synced.

use sync_core::{Inclusion, Schema};

use crate::error::{Result, SyncError};

/// Entity fields the listing call cannot return reliably; never requested.
const CAMPAIGNS_DENYLIST: &[&str] = &[
    "networkSetting",
    "conversionOptimizerEligibility",
    "frequencyCap",
];
const AD_GROUPS_DENYLIST: &[&str] = &["biddingStrategyConfiguration"];

/// Properties to sync, in the discovered schema's order.
///
/// A property is synced when the annotation marks it selected or discovery
/// marked it `automatic`. `unsupported` properties are never synced.
pub fn fields_to_sync(discovered: &Schema, annotated: &Schema) -> Vec<String> {
    let Some(properties) = discovered.properties.as_ref() else {
        return Vec::new();
    };

    properties
        .iter()
        .filter(|(name, schema)| match schema.inclusion {
            Some(Inclusion::Automatic) => true,
            Some(Inclusion::Unsupported) => false,
            _ => annotated.property(name).is_some_and(Schema::is_selected),
        })
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Drop the fields an entity stream never requests.
pub fn filter_fields_by_stream(stream: &str, fields: Vec<String>) -> Result<Vec<String>> {
    let denylist: &[&str] = match stream {
        "campaigns" => CAMPAIGNS_DENYLIST,
        "ad_groups" => AD_GROUPS_DENYLIST,
        "ads" | "accounts" => &[],
        other => {
            return Err(SyncError::Configuration(format!(
                "Unrecognized generic stream name: {other}"
            )))
        }
    };

    Ok(fields
        .into_iter()
        .filter(|f| !denylist.contains(&f.as_str()))
        .collect())
}

/// Wire casing of an entity field name: first character upper-cased.
pub fn wire_field_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
