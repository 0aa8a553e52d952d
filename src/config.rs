//! Connection settings for the Remote Tree Service.

use crate::error::{ExplorerError, Result};

/// Environment variable holding the service origin.
pub const API_URL_ENV: &str = "FILE_EXPLORER_API_URL";

/// Used when no origin is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Path under the origin where the file endpoints live.
const FILES_PATH: &str = "/api/files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    api_url: String,
}

impl ExplorerConfig {
    /// Validates and normalizes an origin such as `http://host:5000/`.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let api_url = api_url.into();
        let trimmed = api_url.trim().trim_end_matches('/');

        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ExplorerError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got '{api_url}'"
            )));
        }
        let host = trimmed.split_once("://").map(|(_, rest)| rest).unwrap_or("");
        if host.is_empty() {
            return Err(ExplorerError::InvalidConfig(format!(
                "API URL has no host: '{api_url}'"
            )));
        }

        Ok(Self {
            api_url: trimmed.to_string(),
        })
    }

    /// Reads [`API_URL_ENV`], falling back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_API_URL),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Base URL of the file endpoints, e.g. `http://localhost:5000/api/files`.
    pub fn files_base(&self) -> String {
        format!("{}{}", self.api_url, FILES_PATH)
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}
