//! Client configuration model.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_HANDOFF_DELAY_MS: u64 = 800;

/// Visual theme of the front end. Has no effect on behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Crimson,
    Ember,
}

impl FromStr for ThemeName {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crimson" => Ok(Self::Crimson),
            "ember" => Ok(Self::Ember),
            other => Err(ClientError::config(format!(
                "unknown theme '{}' (expected 'crimson' or 'ember')",
                other
            ))),
        }
    }
}

/// Root configuration, as stored in `config.toml`.
///
/// Every field has a default so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL; endpoint paths are appended to it.
    pub api_url: String,
    /// Upper bound on one chat request.
    pub request_timeout_secs: u64,
    /// Upper bound on one upload request (indexing can be slow).
    pub upload_timeout_secs: u64,
    /// Pause after a successful upload so the success notice is seen.
    pub handoff_delay_ms: u64,
    pub theme: ThemeName,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            upload_timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
            handoff_delay_ms: DEFAULT_HANDOFF_DELAY_MS,
            theme: ThemeName::default(),
        }
    }
}

impl ClientConfig {
    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::config(format!(
                "api_url must start with http:// or https:// (got '{}')",
                self.api_url
            )));
        }
        if self.request_timeout_secs == 0 || self.upload_timeout_secs == 0 {
            return Err(ClientError::config("timeouts must be greater than zero"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn handoff_delay(&self) -> Duration {
        Duration::from_millis(self.handoff_delay_ms)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::from_base(&self.api_url)
    }
}

/// Backend endpoint URLs, built once from the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub upload: String,
    pub chat: String,
    pub health: String,
}

impl Endpoints {
    pub fn from_base(base: &str) -> Self {
        let base = base.trim().trim_end_matches('/');
        Self {
            upload: format!("{}/api/upload", base),
            chat: format!("{}/api/chat", base),
            health: format!("{}/api/healthcheck", base),
        }
    }
}
