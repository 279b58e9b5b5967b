//! State transport trait and types
//!
//! This module defines the CheckpointStore trait for durable storage of
//! state snapshots, plus the in-process implementations.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Full state mapping as handed to a transport: state-key → cursor text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    entries: BTreeMap<String, String>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StateSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Trait for state transport operations.
///
/// This trait abstracts where state snapshots go, allowing the same sync
/// logic to work with:
/// - A JSON state file (`FilesystemStore`)
/// - A message on the output stream (implemented by the binary)
/// - Nowhere at all (`NullStore`)
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Durably store a full state snapshot, replacing any earlier one.
    async fn store_state(&self, snapshot: &StateSnapshot) -> Result<()>;

    /// Read the most recently stored snapshot.
    ///
    /// Returns None if nothing has been stored.
    async fn read_state(&self) -> Result<Option<StateSnapshot>>;
}

/// A store that discards every snapshot.
#[derive(Debug, Default)]
pub struct NullStore;

#[async_trait]
impl CheckpointStore for NullStore {
    async fn store_state(&self, _snapshot: &StateSnapshot) -> Result<()> {
        Ok(())
    }

    async fn read_state(&self) -> Result<Option<StateSnapshot>> {
        Ok(None)
    }
}

/// A store that keeps every snapshot in memory, in the order received.
#[derive(Debug, Default)]
pub struct MemoryStore {
    history: Mutex<Vec<StateSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots stored so far.
    pub fn history(&self) -> Vec<StateSnapshot> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CheckpointStore for MemoryStore {
    async fn store_state(&self, snapshot: &StateSnapshot) -> Result<()> {
        self.history
            .lock()
            .map_err(|_| anyhow::anyhow!("state history lock poisoned"))?
            .push(snapshot.clone());
        Ok(())
    }

    async fn read_state(&self) -> Result<Option<StateSnapshot>> {
        Ok(self
            .history
            .lock()
            .map_err(|_| anyhow::anyhow!("state history lock poisoned"))?
            .last()
            .cloned())
    }
}
