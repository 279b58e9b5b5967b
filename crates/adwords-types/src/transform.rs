//! Schema-driven typing of remote values.
//!
//! Walks a [`RawValue`] alongside its [`Schema`] and produces typed JSON.
//! Keys absent from the schema are dropped. Scalars that fail to parse
//! become `null` with a warning; a single bad cell never aborts a sync.

use crate::coerce::coerce_scalar;
use sync_core::{RawValue, Record, Schema, SemanticType};
use tracing::warn;

/// Type one remote object (a report row or an entity) into a record.
///
/// A non-mapping input yields an empty record.
pub fn transform_record(raw: &RawValue, schema: &Schema) -> Record {
    match transform_at(raw, schema, "") {
        serde_json::Value::Object(fields) => Record::from_fields(fields),
        _ => Record::new(),
    }
}

fn transform_at(raw: &RawValue, schema: &Schema, path: &str) -> serde_json::Value {
    if schema.schema_type.is_none() && schema.properties.is_none() {
        return raw.to_json();
    }

    match schema.semantic_type() {
        SemanticType::Object => transform_object(raw, schema, path),
        SemanticType::Array => transform_array(raw, schema, path),
        _ => match raw {
            RawValue::Scalar(text) => match coerce_scalar(text, schema) {
                Ok(value) => value,
                Err(e) => {
                    warn!(field = %display_path(path), "{e}; emitting null");
                    serde_json::Value::Null
                }
            },
            _ => {
                warn!(
                    field = %display_path(path),
                    "Expected a scalar, found a nested value; emitting null"
                );
                serde_json::Value::Null
            }
        },
    }
}

fn transform_object(raw: &RawValue, schema: &Schema, path: &str) -> serde_json::Value {
    let Some(mapping) = raw.as_mapping() else {
        if raw.as_str() != Some("") {
            warn!(
                field = %display_path(path),
                "Expected an object; emitting null"
            );
        }
        return serde_json::Value::Null;
    };

    let Some(properties) = schema.properties.as_ref() else {
        return raw.to_json();
    };

    let mut fields = serde_json::Map::new();
    for (name, child) in mapping {
        if let Some(child_schema) = properties.get(name) {
            let child_path = join_path(path, name);
            fields.insert(name.clone(), transform_at(child, child_schema, &child_path));
        }
    }
    serde_json::Value::Object(fields)
}

fn transform_array(raw: &RawValue, schema: &Schema, path: &str) -> serde_json::Value {
    let items = raw.as_list();
    let values = match schema.items.as_deref() {
        Some(item_schema) => items
            .into_iter()
            .map(|item| transform_at(item, item_schema, path))
            .collect(),
        None => items.into_iter().map(RawValue::to_json).collect(),
    };
    serde_json::Value::Array(values)
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
