//! Remote type conversions for sync-core types.
//!
//! # Modules
//!
//! - [`type_map`] - remote field-type tag → schema type descriptor
//! - [`coerce`] - sentinel rewriting and scalar parsing
//! - [`transform`] - `RawValue` + `Schema` → typed `Record`
//!
//! # Example
//!
//! ```ignore
//! use adwords_types::{schema_for_remote_type, transform_record};
//! use sync_core::RawValue;
//!
//! let ctr = schema_for_remote_type("Double");
//! let row = RawValue::flat_mapping([("ctr", "> 90%")]);
//! let record = transform_record(&row, &report_schema);
//! ```

pub mod coerce;
pub mod transform;
pub mod type_map;

pub use coerce::{coerce_scalar, pre_hook, ParseError};
pub use transform::transform_record;
pub use type_map::schema_for_remote_type;
