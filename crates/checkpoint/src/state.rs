//! In-memory cursor map with explicit flushes to a transport.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cursor::{state_key, Cursor};
use crate::store::{CheckpointStore, StateSnapshot};

/// Holds the per-(account, stream) cursors for one run.
///
/// Cursors change only through [`StateStore::set`], and reach durable
/// storage only through [`StateStore::flush`], which always hands the
/// transport the full mapping.
pub struct StateStore {
    start_date: NaiveDate,
    cursors: BTreeMap<String, Cursor>,
    transport: Arc<dyn CheckpointStore>,
}

impl StateStore {
    pub fn new(start_date: NaiveDate, transport: Arc<dyn CheckpointStore>) -> Self {
        Self {
            start_date,
            cursors: BTreeMap::new(),
            transport,
        }
    }

    /// Seed cursors from a previously emitted snapshot.
    ///
    /// Fails on any value that is not a recognizable cursor.
    pub fn with_snapshot(mut self, snapshot: &StateSnapshot) -> anyhow::Result<Self> {
        for (key, value) in snapshot.iter() {
            let cursor: Cursor = value
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid state entry '{key}': {e}"))?;
            self.cursors.insert(key.to_string(), cursor);
        }
        Ok(self)
    }

    /// Seed cursors from whatever the transport last stored.
    pub async fn restore(self) -> anyhow::Result<Self> {
        match self.transport.read_state().await? {
            Some(snapshot) => {
                tracing::info!("Restored {} cursor(s) from state store", snapshot.len());
                self.with_snapshot(&snapshot)
            }
            None => Ok(self),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The stored cursor, if any.
    pub fn cursor(&self, account_id: &str, stream: &str) -> Option<Cursor> {
        self.cursors.get(&state_key(stream, account_id)).copied()
    }

    /// The stored cursor day, or the configured start date when absent.
    pub fn get(&self, account_id: &str, stream: &str) -> NaiveDate {
        self.cursor(account_id, stream)
            .map(|c| c.day())
            .unwrap_or(self.start_date)
    }

    pub fn set(&mut self, account_id: &str, stream: &str, cursor: Cursor) {
        self.cursors.insert(state_key(stream, account_id), cursor);
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.cursors
            .iter()
            .map(|(key, cursor)| (key.clone(), cursor.to_string()))
            .collect()
    }

    /// Hand the full cursor mapping to the transport.
    pub async fn flush(&self) -> anyhow::Result<()> {
        self.transport.store_state(&self.snapshot()).await
    }
}
