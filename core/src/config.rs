//! Provider configuration, read once at startup and injected into the client.

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "NEWS_API_BASE_URL";
pub const API_KEY_VAR: &str = "NEWS_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Base URL and API key for the news provider.
#[derive(Clone, PartialEq, Eq)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

impl NewsConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Read the configuration from the process environment, loading a `.env`
    /// file from the working directory first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env file"),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset. The base URL falls back to
    /// `DEFAULT_BASE_URL`; the API key is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = read(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if let Err(e) = url::Url::parse(&base_url) {
            return Err(ConfigError::Invalid {
                name: BASE_URL_VAR,
                reason: e.to_string(),
            });
        }
        let api_key = read(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;

        Ok(Self { base_url, api_key })
    }
}
