//! adwords-sync
//!
//! Extracts advertising-account data as a stream of messages: one SCHEMA
//! message per synced stream, RECORD messages for its rows and STATE
//! messages carrying report progress.
//!
//! # CLI Usage
//!
//! ```bash
//! # Write the discovered catalog
//! adwords-sync discover --config config.json > catalog.json
//!
//! # Sync the streams selected in an annotated catalog
//! adwords-sync sync --config config.json --catalog catalog.json --state state.json
//! ```
//!
//! # Crates
//!
//! - `sync_core` - schemas, catalogs and record values
//! - `adwords_types` - remote type mapping and record transformation
//! - `checkpoint` - per-account report cursors and their transports
//! - `adwords_sync_source` - discovery and the sync engine
//! - `adwords_sync_http` - the HTTP remote API

pub mod commands;
pub mod config;
pub mod output;

pub use commands::{discover, sync, SyncOptions};
pub use config::Config;
pub use output::MessageWriter;
