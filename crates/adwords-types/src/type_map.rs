//! Remote field-type tag → schema type descriptor.

use sync_core::{JsonType, Schema, SchemaType};

/// Map a remote field-type tag to a property schema.
///
/// Every known tag maps to a nullable JSON type; dates map to nullable
/// strings with `format: date-time`. Unrecognized tags fall back to a
/// nullable string so discovery never fails on a type it has not seen.
pub fn schema_for_remote_type(tag: &str) -> Schema {
    let (json_type, format) = match tag {
        "Boolean" | "boolean" => (JsonType::Boolean, None),
        "Double" => (JsonType::Number, None),
        "int" | "Integer" | "long" | "Long" => (JsonType::Integer, None),
        "Date" | "DateTime" => (JsonType::String, Some("date-time")),
        _ => (JsonType::String, None),
    };

    Schema {
        schema_type: Some(SchemaType::nullable(json_type)),
        format: format.map(str::to_string),
        ..Default::default()
    }
}
