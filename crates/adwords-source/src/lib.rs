//! Sync engine for advertising-account data.
//!
//! Discovers entity and report streams, validates the operator's field
//! selection, and extracts records into a [`record_sink::RecordSink`] while
//! checkpointing report progress through [`checkpoint::StateStore`].
//!
//! # Modules
//!
//! - [`catalog`] - stream discovery and report schema construction
//! - [`selector`] - which fields of a stream are synced
//! - [`exclusion`] - mutually exclusive report fields
//! - [`report`] - day-windowed report extraction
//! - [`paginator`] - offset-paginated entity listings
//! - [`dispatch`] - per-account, per-stream orchestration

pub mod catalog;
mod context;
pub mod dispatch;
mod error;
pub mod exclusion;
pub mod paginator;
pub mod report;
pub mod selector;

pub use context::{Clock, SyncContext, SystemClock};
pub use dispatch::{resolve_selection, run_discover, run_sync, SelectedStream};
pub use error::{Result, SyncError};
