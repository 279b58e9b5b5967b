//! Type descriptors for stream schemas.
//!
//! Schemas are JSON-schema documents, so a property's declared type is one
//! JSON type or a union of them (`"string"` or `["null", "integer"]`).
//! [`SemanticType`] is the normalized view the record transformer works
//! with: the first non-null JSON type, with `string` + `format: date-time`
//! promoted to [`SemanticType::DateTime`].

use serde::{Deserialize, Serialize};

/// A single JSON-schema type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Object,
    Array,
}

impl JsonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Object => "object",
            JsonType::Array => "array",
        }
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` keyword of a schema property.
///
/// Serializes back in the shape it was read in, so a discovered schema
/// survives an annotate-and-reload cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `"type": "string"`
    Single(JsonType),
    /// `"type": ["null", "string"]`
    Union(Vec<JsonType>),
}

impl SchemaType {
    /// A nullable union of `null` and the given type.
    pub fn nullable(json_type: JsonType) -> Self {
        SchemaType::Union(vec![JsonType::Null, json_type])
    }

    /// All declared JSON types, in declaration order.
    pub fn types(&self) -> &[JsonType] {
        match self {
            SchemaType::Single(t) => std::slice::from_ref(t),
            SchemaType::Union(types) => types,
        }
    }

    /// Whether `null` is an accepted value.
    pub fn is_nullable(&self) -> bool {
        self.types().contains(&JsonType::Null)
    }

    /// The first declared type that is not `null`.
    pub fn primary(&self) -> Option<JsonType> {
        self.types().iter().copied().find(|t| *t != JsonType::Null)
    }
}

/// Normalized semantic type of a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Boolean,
    Number,
    Integer,
    DateTime,
    String,
    Object,
    Array,
}

impl SemanticType {
    /// Derive the semantic type from a JSON type and an optional format.
    ///
    /// A property that only admits `null` is treated as a string.
    pub fn from_json(json_type: Option<JsonType>, format: Option<&str>) -> Self {
        match json_type {
            Some(JsonType::Boolean) => SemanticType::Boolean,
            Some(JsonType::Integer) => SemanticType::Integer,
            Some(JsonType::Number) => SemanticType::Number,
            Some(JsonType::Object) => SemanticType::Object,
            Some(JsonType::Array) => SemanticType::Array,
            Some(JsonType::String) if format == Some("date-time") => SemanticType::DateTime,
            Some(JsonType::String) | Some(JsonType::Null) | None => SemanticType::String,
        }
    }
}
