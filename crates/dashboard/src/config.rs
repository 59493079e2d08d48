//! Dashboard configuration, read from the environment.

use thiserror::Error;

pub const API_URL_VAR: &str = "STOCKROOM_API_URL";
pub const AUTH_TOKEN_VAR: &str = "STOCKROOM_AUTH_TOKEN";
pub const EMAIL_VAR: &str = "STOCKROOM_EMAIL";
pub const PASSWORD_VAR: &str = "STOCKROOM_PASSWORD";

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STOCKROOM_API_URL must be an http(s) URL, got {0:?}")]
    InvalidApiUrl(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// API base URL, without a trailing slash.
    pub api_url: String,
    /// Bearer token to start the session with.
    pub auth_token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get(API_URL_VAR).unwrap_or_else(|| {
            tracing::debug!("{API_URL_VAR} not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(api_url));
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            auth_token: get(AUTH_TOKEN_VAR),
            email: get(EMAIL_VAR),
            password: get(PASSWORD_VAR),
        })
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            email: None,
            password: None,
        }
    }
}

impl core::fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("api_url", &self.api_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
