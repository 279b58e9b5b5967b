//! Checkpoint management for adwords-sync
//!
//! Tracks how far each (account, report stream) pair has been synced and
//! hands that progress to a pluggable transport.
//!
//! # Architecture
//!
//! - `Cursor` - the last fully emitted day of a report stream
//! - `StateStore` - the in-memory cursor map for one run, with `flush`
//! - `CheckpointStore` - where flushed snapshots go
//!
//! ## Storage Backends
//!
//! - `FilesystemStore` - Keeps the latest snapshot in a JSON file
//! - `MemoryStore` - Keeps every snapshot in memory, for tests
//! - `NullStore` - Discards snapshots
//!
//! The binary adds a fourth backend that writes snapshots as STATE
//! messages on stdout.

mod cursor;
mod filesystem;
mod state;
pub mod store;


pub use cursor::{state_key, Cursor};
pub use filesystem::FilesystemStore;
pub use state::StateStore;
pub use store::{CheckpointStore, MemoryStore, NullStore, StateSnapshot};
