//! HTTP implementation of [`adwords_api::AdwordsApi`].
//!
//! - OAuth2 refresh-token grant with a cached access token
//! - Report type enumeration from the report definition schema
//! - SOAP calls for report field metadata and entity listings
//! - CSV report downloads
//!
//! There is no retry or backoff here; a failed call surfaces to the engine.

mod client;
mod config;
mod oauth;
mod report_definition;
mod soap;
pub mod xml;

pub use client::HttpAdwordsApi;
pub use config::{HttpApiConfig, DEFAULT_API_BASE_URL, DEFAULT_API_VERSION, DEFAULT_OAUTH_BASE_URL};
