//! Core types for the adwords-sync framework.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace:
//!
//! - [`JsonType`] / [`SchemaType`] - JSON-schema type descriptors
//! - [`SemanticType`] - Normalized semantic type of a schema property
//! - [`Schema`] / [`Properties`] - Discovered and annotated stream schemas
//! - [`Stream`] / [`StreamKind`] - Syncable units, classified once at discovery
//! - [`Catalog`] - The discovery document handed to the operator for annotation
//! - [`RawValue`] - Remote-shaped values before schema-driven typing
//! - [`Record`] - Schema-typed output records
//!
//! # Architecture
//!
//! ```text
//! sync-core (this crate)
//!    │
//!    ├─── adwords-types        (type mapping and record transformation)
//!    ├─── adwords-api          (remote collaborator trait)
//!    ├─── record-sink          (record emission trait)
//!    └─── adwords-sync-source  (the sync engine)
//! ```

pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use schema::{Catalog, CatalogEntry, Inclusion, Properties, Schema, SchemaError, Stream, StreamKind};
pub use types::{JsonType, SchemaType, SemanticType};
pub use values::{RawValue, Record};
