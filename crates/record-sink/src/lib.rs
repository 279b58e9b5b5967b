//! Record sink trait abstraction.
//!
//! This crate defines the `RecordSink` trait that decouples the sync engine
//! from how records are framed for downstream consumers. The binary writes
//! line-delimited messages to stdout; tests collect into memory.

mod traits;

pub use traits::RecordSink;
