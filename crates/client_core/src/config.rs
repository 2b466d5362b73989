use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const SETTINGS_FILE: &str = "rfp_client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            request_timeout_secs: 30,
            poll_interval_ms: 500,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Applies an explicit base URL (e.g. from the command line) and
    /// validates the result.
    pub fn with_api_base(mut self, api_base: Option<&str>) -> Result<Self> {
        if let Some(raw) = api_base {
            self.api_base = raw.to_string();
        }
        self.api_base = normalize_api_base(&self.api_base)?;
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base: Option<String>,
    request_timeout_secs: Option<u64>,
    poll_interval_ms: Option<u64>,
}

/// Defaults, then `rfp_client.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base {
                    settings.api_base = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.poll_interval_ms {
                    settings.poll_interval_ms = v;
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
            }
        }
    }

    if let Ok(v) = std::env::var("RFP_API_BASE") {
        settings.api_base = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__POLL_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.poll_interval_ms = parsed;
        }
    }

    settings
}

/// Trims whitespace and trailing slashes; empty means the default base.
pub fn normalize_api_base(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE.to_string());
    }

    let parsed = Url::parse(trimmed)
        .map_err(|err| ClientError::InvalidConfig(format!("api base '{trimmed}': {err}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClientError::InvalidConfig(format!(
                "api base '{trimmed}' must use http or https, not {other}"
            )))
        }
    }
    if parsed.host_str().is_none() {
        return Err(ClientError::InvalidConfig(format!(
            "api base '{trimmed}' has no host"
        )));
    }

    Ok(trimmed.to_string())
}
