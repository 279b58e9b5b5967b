//! Run configuration loaded from a JSON file.

use adwords_sync_http::HttpApiConfig;
use adwords_sync_source::SyncError;
use anyhow::Context;
use checkpoint::Cursor;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

pub const REQUIRED_KEYS: &[&str] = &[
    "start_date",
    "oauth_client_id",
    "oauth_client_secret",
    "user_agent",
    "refresh_token",
    "customer_ids",
    "developer_token",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub start_date: NaiveDate,
    pub oauth_client_id: String,
    pub oauth_client_secret: String,
    pub user_agent: String,
    pub refresh_token: String,
    pub customer_ids: Vec<String>,
    pub developer_token: String,
    pub api_base_url: Option<String>,
    pub oauth_base_url: Option<String>,
    pub api_version: Option<String>,
}

/// The config document as written, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    start_date: Option<String>,
    oauth_client_id: Option<String>,
    oauth_client_secret: Option<String>,
    user_agent: Option<String>,
    refresh_token: Option<String>,
    customer_ids: Option<String>,
    developer_token: Option<String>,
    api_base_url: Option<String>,
    oauth_base_url: Option<String>,
    api_version: Option<String>,
}

impl RawConfig {
    /// Trimmed value of a required key; empty counts as absent.
    fn required(&self, key: &str) -> Option<&str> {
        let value = match key {
            "start_date" => &self.start_date,
            "oauth_client_id" => &self.oauth_client_id,
            "oauth_client_secret" => &self.oauth_client_secret,
            "user_agent" => &self.user_agent,
            "refresh_token" => &self.refresh_token,
            "customer_ids" => &self.customer_ids,
            "developer_token" => &self.developer_token,
            _ => return None,
        };
        non_empty(value)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn split_customer_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path:?}"))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid config file {path:?}"))
    }

    /// Parse and validate a config document.
    ///
    /// Every missing or empty required key is reported in one error.
    pub fn from_json_str(text: &str) -> Result<Self, SyncError> {
        let raw: RawConfig = serde_json::from_str(text)
            .map_err(|e| SyncError::Configuration(format!("Config is not valid: {e}")))?;
        Self::validate(&raw)
    }

    fn validate(raw: &RawConfig) -> Result<Self, SyncError> {
        let customer_ids = raw
            .required("customer_ids")
            .map(split_customer_ids)
            .unwrap_or_default();

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| match *key {
                "customer_ids" => customer_ids.is_empty(),
                _ => raw.required(key).is_none(),
            })
            .collect();
        if !missing.is_empty() {
            return Err(SyncError::Configuration(format!(
                "Config is missing required keys: {}",
                missing.join(", ")
            )));
        }

        let text_of = |key: &str| raw.required(key).unwrap_or_default().to_string();

        let start_date = text_of("start_date")
            .parse::<Cursor>()
            .map_err(|e| SyncError::Configuration(format!("Invalid start_date: {e}")))?
            .day();

        Ok(Self {
            start_date,
            oauth_client_id: text_of("oauth_client_id"),
            oauth_client_secret: text_of("oauth_client_secret"),
            user_agent: text_of("user_agent"),
            refresh_token: text_of("refresh_token"),
            customer_ids,
            developer_token: text_of("developer_token"),
            api_base_url: non_empty(&raw.api_base_url).map(str::to_string),
            oauth_base_url: non_empty(&raw.oauth_base_url).map(str::to_string),
            api_version: non_empty(&raw.api_version).map(str::to_string),
        })
    }

    /// Connection settings for the HTTP collaborator.
    pub fn http_config(&self) -> HttpApiConfig {
        let defaults = HttpApiConfig::default();
        HttpApiConfig {
            oauth_client_id: self.oauth_client_id.clone(),
            oauth_client_secret: self.oauth_client_secret.clone(),
            refresh_token: self.refresh_token.clone(),
            developer_token: self.developer_token.clone(),
            user_agent: self.user_agent.clone(),
            api_base_url: self.api_base_url.clone().unwrap_or(defaults.api_base_url),
            oauth_base_url: self
                .oauth_base_url
                .clone()
                .unwrap_or(defaults.oauth_base_url),
            api_version: self.api_version.clone().unwrap_or(defaults.api_version),
            timeout_secs: defaults.timeout_secs,
        }
    }
}
