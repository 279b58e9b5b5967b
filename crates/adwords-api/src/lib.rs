//! Remote API abstraction.
//!
//! This crate defines the `AdwordsApi` trait the sync engine talks to and
//! the request/response types that cross it. `adwords-sync-http` provides
//! the network implementation; tests use in-memory fakes.

mod traits;
mod types;

pub use traits::AdwordsApi;
pub use types::{
    DateRange, DownloadFormat, DownloadOptions, EntityPage, EntitySelector, Paging,
    ReportFieldDescription, ReportRequest,
};
