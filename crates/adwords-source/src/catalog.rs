//! Stream discovery: bundled entity schemas and remote-described reports.

use adwords_api::{AdwordsApi, ReportFieldDescription};
use adwords_types::schema_for_remote_type;
use sync_core::{
    Catalog, Inclusion, JsonType, Properties, Schema, SchemaType, Stream, StreamKind,
};
use tracing::info;

use crate::error::{Result, SyncError};

/// Synthetic account property stamped onto every record.
pub const CUSTOMER_ID: &str = "customer_id";

/// Synthetic per-day row ordinal of report records.
pub const ROW_ID: &str = "_sdc_id";

/// Report types excluded from discovery: not queryable by date range, or
/// not supported at all.
pub const UNSUPPORTED_REPORTS: &[&str] = &[
    "UNKNOWN",
    "CAMPAIGN_NEGATIVE_KEYWORDS_PERFORMANCE_REPORT",
    "CAMPAIGN_NEGATIVE_PLACEMENTS_PERFORMANCE_REPORT",
    "SHARED_SET_REPORT",
    "CAMPAIGN_SHARED_SET_REPORT",
    "SHARED_SET_CRITERIA_REPORT",
    "BUDGET_PERFORMANCE_REPORT",
    "CAMPAIGN_NEGATIVE_LOCATIONS_REPORT",
    "LABEL_REPORT",
];

/// Report types the remote service refuses to query further back than
/// [`LOOKBACK_DAYS`].
pub const BOUNDED_LOOKBACK_REPORTS: &[&str] = &["CLICK_PERFORMANCE_REPORT"];

pub const LOOKBACK_DAYS: u64 = 90;

/// Primary keys of every report stream.
pub const REPORT_PRIMARY_KEYS: [&str; 3] = [CUSTOMER_ID, "day", ROW_ID];

/// A generic entity listing endpoint.
#[derive(Debug)]
pub struct EntityEndpoint {
    pub stream: &'static str,
    pub service: &'static str,
    pub primary_keys: &'static [&'static str],
    schema: &'static str,
}

pub const ENTITY_ENDPOINTS: &[EntityEndpoint] = &[
    EntityEndpoint {
        stream: "campaigns",
        service: "CampaignService",
        primary_keys: &["id"],
        schema: include_str!("../schemas/campaigns.json"),
    },
    EntityEndpoint {
        stream: "ad_groups",
        service: "AdGroupService",
        primary_keys: &["id"],
        schema: include_str!("../schemas/ad_groups.json"),
    },
    EntityEndpoint {
        stream: "ads",
        service: "AdGroupAdService",
        primary_keys: &["adGroupId"],
        schema: include_str!("../schemas/ads.json"),
    },
    EntityEndpoint {
        stream: "accounts",
        service: "ManagedCustomerService",
        primary_keys: &["customerId"],
        schema: include_str!("../schemas/accounts.json"),
    },
];

impl EntityEndpoint {
    /// The bundled schema, plus the synthetic `customer_id` property.
    pub fn schema(&self) -> Result<Schema> {
        let mut schema = Schema::from_json_str(self.schema).map_err(|e| {
            SyncError::Configuration(format!("Bundled schema for {} is invalid: {e}", self.stream))
        })?;
        schema
            .properties
            .get_or_insert_with(Properties::new)
            .insert(CUSTOMER_ID, customer_id_property());
        Ok(schema)
    }

    pub fn stream(&self) -> Result<Stream> {
        Ok(Stream::new(
            self.stream,
            StreamKind::Entity,
            self.primary_keys.iter().map(|k| k.to_string()).collect(),
            self.schema()?,
        ))
    }
}

/// Look up an entity endpoint by stream name.
pub fn entity_endpoint(stream: &str) -> Option<&'static EntityEndpoint> {
    ENTITY_ENDPOINTS.iter().find(|e| e.stream == stream)
}

/// Resolve a stream name to its kind. Anything that is not a known entity
/// listing is a report type.
pub fn classify(stream: &str) -> StreamKind {
    if entity_endpoint(stream).is_some() {
        StreamKind::Entity
    } else {
        StreamKind::Report
    }
}

pub fn is_bounded_lookback(stream: &str) -> bool {
    BOUNDED_LOOKBACK_REPORTS.contains(&stream)
}

fn customer_id_property() -> Schema {
    Schema {
        schema_type: Some(SchemaType::Single(JsonType::String)),
        description: Some("Profile ID".to_string()),
        behavior: Some("ATTRIBUTE".to_string()),
        field: Some(CUSTOMER_ID.to_string()),
        inclusion: Some(Inclusion::Automatic),
        ..Default::default()
    }
}

fn row_id_property() -> Schema {
    Schema {
        schema_type: Some(SchemaType::Single(JsonType::Integer)),
        inclusion: Some(Inclusion::Automatic),
        ..Default::default()
    }
}

/// The statically known entity streams.
pub fn discover_entity_streams() -> Result<Vec<Stream>> {
    info!("Starting generic discovery");
    let streams = ENTITY_ENDPOINTS
        .iter()
        .map(|endpoint| {
            info!("Loading schema for {}", endpoint.stream);
            endpoint.stream()
        })
        .collect::<Result<Vec<_>>>()?;
    info!("Generic discovery complete");
    Ok(streams)
}

/// Every supported report type, each with its remote-described schema.
pub async fn discover_report_streams<A: AdwordsApi>(
    api: &A,
    customer_id: &str,
) -> Result<Vec<Stream>> {
    let report_types = api
        .list_report_types()
        .await
        .map_err(|source| SyncError::Discovery {
            stream: "report types".to_string(),
            source,
        })?;

    info!("Starting report discovery");
    let mut streams = Vec::new();
    for report_type in report_types
        .iter()
        .filter(|t| !UNSUPPORTED_REPORTS.contains(&t.as_str()))
    {
        let schema = create_schema_for_report(api, customer_id, report_type).await?;
        streams.push(Stream::new(
            report_type.clone(),
            StreamKind::Report,
            REPORT_PRIMARY_KEYS.iter().map(|k| k.to_string()).collect(),
            schema,
        ));
    }
    info!("Report discovery complete");
    Ok(streams)
}

/// Entity streams followed by report streams, as one document.
pub async fn discover_catalog<A: AdwordsApi>(api: &A, customer_id: &str) -> Result<Catalog> {
    let mut streams = discover_entity_streams()?;
    streams.extend(discover_report_streams(api, customer_id).await?);
    Ok(Catalog::from_streams(&streams))
}

/// Fetch the field descriptions of a report type and build its schema.
pub async fn create_schema_for_report<A: AdwordsApi>(
    api: &A,
    customer_id: &str,
    report_type: &str,
) -> Result<Schema> {
    info!("Loading schema for {report_type}");
    let fields = api
        .describe_report_fields(customer_id, report_type)
        .await
        .map_err(|source| SyncError::Discovery {
            stream: report_type.to_string(),
            source,
        })?;
    Ok(build_report_schema(report_type, &fields))
}

/// Build a report schema from remote field descriptions.
pub fn build_report_schema(report_type: &str, fields: &[ReportFieldDescription]) -> Schema {
    let mut properties = Properties::new();

    for field in fields {
        let inclusion = if field.xml_attribute_name == "day" {
            Inclusion::Automatic
        } else {
            Inclusion::Available
        };
        properties.insert(
            field.xml_attribute_name.clone(),
            Schema {
                description: Some(field.display_field_name.clone()),
                behavior: Some(field.field_behavior.clone()),
                field: Some(field.field_name.clone()),
                inclusion: Some(inclusion),
                ..schema_for_remote_type(&field.field_type)
            },
        );
    }

    properties.insert(CUSTOMER_ID, customer_id_property());
    properties.insert(ROW_ID, row_id_property());

    // Described as an integer by the field service, but carries values like
    // "image/jpeg".
    if report_type == "AD_PERFORMANCE_REPORT" {
        properties.insert(
            "imageMimeType",
            Schema {
                schema_type: Some(SchemaType::nullable(JsonType::String)),
                description: Some("Image Mime Type".to_string()),
                behavior: Some("ATTRIBUTE".to_string()),
                field: Some("ImageCreativeMimeType".to_string()),
                inclusion: Some(Inclusion::Available),
                ..Default::default()
            },
        );
    }

    Schema {
        is_report: Some("true".to_string()),
        inclusion: Some(Inclusion::Available),
        ..Schema::object(properties)
    }
}
