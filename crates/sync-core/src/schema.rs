//! Schema and catalog definitions for the adwords-sync framework.
//!
//! ## Type Hierarchy
//!
//! - `Schema` - One JSON-schema node: a stream's top-level object schema or
//!   a single property. Carries the discovery-only `inclusion` marker and
//!   the operator's `selected` annotation.
//! - `Properties` - Ordered property map. Insertion order is significant:
//!   entity field lists are sent to the remote service in this order.
//! - `Stream` - A syncable unit with its kind resolved once.
//! - `Catalog` - The discovery document (`{"streams": [...]}`).
//!
//! Schemas must be deserialized from text (files or strings), not from an
//! intermediate `serde_json::Value`, or property order is lost.

use crate::types::{SchemaType, SemanticType};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema and catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading a schema or catalog file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Stream not found in catalog
    #[error("Stream not found: {0}")]
    StreamNotFound(String),
}

// ============================================================================
// Schema
// ============================================================================

/// Discovery-time inclusion marker of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    /// Always synced, regardless of selection
    Automatic,
    /// Synced only when selected
    Available,
    /// Never synced
    Unsupported,
}

/// A JSON-schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Display label; for report fields this is the column header the
    /// remote service uses in tabular downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Remote field behavior (`ATTRIBUTE`, `METRIC`, `SEGMENT`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,

    /// Name used for this field in remote requests, when it differs from
    /// the property name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<Inclusion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_report: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Keywords this crate does not interpret, kept for round-tripping.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Schema {
    /// Create a property schema of the given type.
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// Create an object schema with the given properties.
    pub fn object(properties: Properties) -> Self {
        Self {
            schema_type: Some(SchemaType::Single(crate::JsonType::Object)),
            properties: Some(properties),
            ..Default::default()
        }
    }

    /// Parse a schema from JSON text, preserving property order.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalized semantic type of this node.
    pub fn semantic_type(&self) -> SemanticType {
        SemanticType::from_json(
            self.schema_type.as_ref().and_then(|t| t.primary()),
            self.format.as_deref(),
        )
    }

    /// Whether this node admits `null`. Untyped nodes admit anything.
    pub fn is_nullable(&self) -> bool {
        self.schema_type
            .as_ref()
            .map(|t| t.is_nullable())
            .unwrap_or(true)
    }

    /// Whether the operator marked this node as selected.
    pub fn is_selected(&self) -> bool {
        self.selected == Some(true)
    }

    /// Whether the discovered inclusion is `automatic`.
    pub fn is_automatic(&self) -> bool {
        self.inclusion == Some(Inclusion::Automatic)
    }

    /// Get a property schema by name.
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.as_ref().and_then(|p| p.get(name))
    }

    /// Remove every `inclusion` marker from this node and its descendants.
    ///
    /// Inclusion is discovery-only metadata and must not reach record
    /// consumers.
    pub fn strip_inclusion(&mut self) {
        self.inclusion = None;
        if let Some(properties) = self.properties.as_mut() {
            for (_, child) in properties.iter_mut() {
                child.strip_inclusion();
            }
        }
        if let Some(items) = self.items.as_mut() {
            items.strip_inclusion();
        }
    }

    /// A copy of this schema with inclusion markers removed.
    pub fn without_inclusion(&self) -> Schema {
        let mut copy = self.clone();
        copy.strip_inclusion();
        copy
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Insertion-ordered map of property name to schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, Schema)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property. An existing property of the same name is replaced
    /// in place, keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = schema,
            None => self.entries.push((name, schema)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Schema)> {
        self.entries.iter_mut().map(|(n, s)| (n.as_str(), s))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Schema)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, Schema)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (name, schema) in iter {
            properties.insert(name, schema);
        }
        properties
    }
}

impl Serialize for Properties {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, schema) in &self.entries {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of property names to schemas")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut properties = Properties::new();
                while let Some((name, schema)) = map.next_entry::<String, Schema>()? {
                    properties.insert(name, schema);
                }
                Ok(properties)
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

// ============================================================================
// Streams and Catalog
// ============================================================================

/// How a stream is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Paginated listing, fully resynced every run
    Entity,
    /// Day-windowed report, synced incrementally by date
    Report,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Entity => f.write_str("entity"),
            StreamKind::Report => f.write_str("report"),
        }
    }
}

/// A syncable unit. Built once per run and not mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub name: String,
    pub kind: StreamKind,
    pub primary_keys: Vec<String>,
    pub schema: Schema,
}

impl Stream {
    pub fn new(
        name: impl Into<String>,
        kind: StreamKind,
        primary_keys: Vec<String>,
        schema: Schema,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            primary_keys,
            schema,
        }
    }

    /// The catalog entry describing this stream.
    pub fn to_catalog_entry(&self) -> CatalogEntry {
        CatalogEntry {
            stream: self.name.clone(),
            tap_stream_id: self.name.clone(),
            stream_kind: Some(self.kind),
            schema: self.schema.clone(),
        }
    }
}

/// One stream in the discovery document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub stream: String,
    pub tap_stream_id: String,
    /// Resolved at discovery; absent in catalogs written without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_kind: Option<StreamKind>,
    pub schema: Schema,
}

/// The discovery document, and after annotation, the sync selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_streams(streams: &[Stream]) -> Self {
        Self {
            streams: streams.iter().map(Stream::to_catalog_entry).collect(),
        }
    }

    /// Load an annotated catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get_stream(&self, name: &str) -> Result<&CatalogEntry, SchemaError> {
        self.streams
            .iter()
            .find(|entry| entry.stream == name)
            .ok_or_else(|| SchemaError::StreamNotFound(name.to_string()))
    }

    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|e| e.stream.as_str()).collect()
    }
}
