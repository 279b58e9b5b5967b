//! Error types for the sync engine.

use thiserror::Error;

/// Errors that abort a sync or discovery run.
///
/// Every variant is fatal for the whole run. Malformed field values are not
/// errors; they are coerced to null during record transformation.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Missing or invalid setting, or an unknown stream name.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A remote metadata call failed while building a schema.
    #[error("Discovery failed for stream '{stream}': {source:#}")]
    Discovery {
        stream: String,
        #[source]
        source: anyhow::Error,
    },

    /// The selected fields cannot be requested together.
    #[error("Invalid field selection for stream '{stream}': {message}")]
    Validation { stream: String, message: String },

    /// A report download or entity page request failed.
    #[error("Transport error: {0:#}")]
    Transport(#[source] anyhow::Error),

    /// The record sink or state transport failed.
    #[error("Output error: {0:#}")]
    Output(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
