use serde::{Deserialize, Serialize};

/// Connection settings for the remote advertising API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpApiConfig {
    /// OAuth2 client ID.
    pub oauth_client_id: String,
    /// OAuth2 client secret.
    pub oauth_client_secret: String,
    /// Long-lived refresh token exchanged for access tokens.
    pub refresh_token: String,
    /// Developer token sent with every API call.
    pub developer_token: String,
    /// User agent sent in the SOAP request header.
    pub user_agent: String,
    /// Base URL of the API (e.g. `https://adwords.google.com`).
    pub api_base_url: String,
    /// Base URL of the OAuth2 service (e.g. `https://accounts.google.com`).
    pub oauth_base_url: String,
    /// API version path segment (e.g. `v201705`).
    pub api_version: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

pub const DEFAULT_API_BASE_URL: &str = "https://adwords.google.com";
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://accounts.google.com";
pub const DEFAULT_API_VERSION: &str = "v201705";

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self {
            oauth_client_id: String::new(),
            oauth_client_secret: String::new(),
            refresh_token: String::new(),
            developer_token: String::new(),
            user_agent: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            oauth_base_url: DEFAULT_OAUTH_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: 300,
        }
    }
}

impl HttpApiConfig {
    pub(crate) fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub(crate) fn token_url(&self) -> String {
        format!("{}/o/oauth2/token", self.oauth_base_url.trim_end_matches('/'))
    }

    pub(crate) fn report_download_url(&self) -> String {
        format!(
            "{}/api/adwords/reportdownload/{}",
            self.api_base(),
            self.api_version
        )
    }

    pub(crate) fn report_definition_xsd_url(&self) -> String {
        format!("{}/reportDefinition.xsd", self.report_download_url())
    }

    /// Namespace of a service's group (`cm` or `mcm`).
    pub(crate) fn namespace(&self, group: &str) -> String {
        format!(
            "https://adwords.google.com/api/adwords/{group}/{}",
            self.api_version
        )
    }

    pub(crate) fn service_url(&self, group: &str, service: &str) -> String {
        format!(
            "{}/api/adwords/{group}/{}/{service}",
            self.api_base(),
            self.api_version
        )
    }
}
