//! OAuth2 refresh-token grant with a cached access token.

use crate::config::HttpApiConfig;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::debug;

/// Seconds shaved off the advertised lifetime so a token is never used at
/// the edge of its expiry.
const EXPIRY_BUFFER_SECS: u64 = 60;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Option<SystemTime>,
}

impl AccessToken {
    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| SystemTime::now() > expires_at)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    token: RwLock<Option<AccessToken>>,
}

impl TokenCache {
    /// Current access token, refreshed first when missing or expired.
    pub async fn access_token(&self, client: &Client, config: &HttpApiConfig) -> Result<String> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref().filter(|t| !t.is_expired()) {
                return Ok(token.value.clone());
            }
        }

        let token = refresh(client, config).await?;
        let value = token.value.clone();
        *self.token.write().await = Some(token);
        Ok(value)
    }
}

async fn refresh(client: &Client, config: &HttpApiConfig) -> Result<AccessToken> {
    debug!("Refreshing OAuth access token");

    let response = client
        .post(config.token_url())
        .form(&[
            ("client_id", config.oauth_client_id.as_str()),
            ("client_secret", config.oauth_client_secret.as_str()),
            ("refresh_token", config.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await
        .context("token refresh request failed")?;

    if !response.status().is_success() {
        let status = response.status();
        let error = response.text().await.unwrap_or_default();
        return Err(anyhow!("token refresh failed ({status}): {error}"));
    }

    let body: TokenResponse = response
        .json()
        .await
        .context("failed to parse token response")?;

    let expires_at = body.expires_in.map(|secs| {
        SystemTime::now() + Duration::from_secs(secs.saturating_sub(EXPIRY_BUFFER_SECS))
    });

    Ok(AccessToken {
        value: body.access_token,
        expires_at,
    })
}
