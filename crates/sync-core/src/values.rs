//! Value representations for the adwords-sync framework.
//!
//! [`RawValue`] is the remote-shaped side: a plain tree of scalars,
//! sequences and mappings with no schema attached. Report rows are flat
//! mappings of strings; entity objects are arbitrarily nested. Every remote
//! response is flattened into this shape before any typing happens.
//!
//! [`Record`] is the typed output side: one JSON object per emitted row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Remote-shaped value before schema-driven typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Leaf text value
    Scalar(String),
    /// Ordered list of values
    Sequence(Vec<RawValue>),
    /// Named children
    Mapping(BTreeMap<String, RawValue>),
}

impl RawValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        RawValue::Scalar(value.into())
    }

    /// Build a flat mapping of scalars, e.g. one parsed report row.
    pub fn flat_mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RawValue::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), RawValue::Scalar(v.into())))
                .collect(),
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, RawValue>> {
        match self {
            RawValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// View this value as a list.
    ///
    /// Tree-shaped wire formats cannot tell a one-element list from a single
    /// child, so a non-sequence is treated as a list of itself.
    pub fn as_list(&self) -> Vec<&RawValue> {
        match self {
            RawValue::Sequence(items) => items.iter().collect(),
            other => vec![other],
        }
    }

    /// Convert to JSON without any schema guidance.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            RawValue::Scalar(s) => serde_json::Value::String(s.clone()),
            RawValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(RawValue::to_json).collect())
            }
            RawValue::Mapping(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// A schema-typed output record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { fields }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_json(self) -> serde_json::Value {
        serde_json::Value::Object(self.fields)
    }
}
