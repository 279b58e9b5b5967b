//! Filesystem-based state storage implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::store::{CheckpointStore, StateSnapshot};

/// Filesystem implementation of CheckpointStore trait.
///
/// Keeps the latest snapshot as a single JSON object in one file. Writes go
/// to a sibling temporary file first and are renamed into place, so a crash
/// mid-write leaves the previous snapshot intact.
pub struct FilesystemStore {
    path: PathBuf,
}

impl FilesystemStore {
    /// Create a new FilesystemStore writing to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CheckpointStore for FilesystemStore {
    async fn store_state(&self, snapshot: &StateSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(snapshot)?)
            .with_context(|| format!("Failed to write state to {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move state into {}", self.path.display()))?;

        tracing::debug!("Stored state to {}", self.path.display());
        Ok(())
    }

    async fn read_state(&self) -> Result<Option<StateSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state from {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }
}
