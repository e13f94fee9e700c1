use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const CONFIG_FILE_PATH: &str = "axis.toml";

const DEFAULT_BASE_URL: &str = "http://mkholm-n8n.duckdns.org:5679";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const BASE_URL_ENV: &str = "AXIS_WEBHOOK_BASE_URL";
pub const TIMEOUT_ENV: &str = "AXIS_REQUEST_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid webhook URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Paths of the three webhook endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_contact_path")]
    pub contact: String,
    #[serde(default = "default_subscribe_path")]
    pub subscribe: String,
    #[serde(default = "default_chat_path")]
    pub chat: String,
}

fn default_contact_path() -> String {
    "/webhook/Form".to_string()
}

fn default_subscribe_path() -> String {
    "/webhook/subscribe".to_string()
}

fn default_chat_path() -> String {
    "/webhook/chat".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            contact: default_contact_path(),
            subscribe: default_subscribe_path(),
            chat: default_chat_path(),
        }
    }
}

/// Where the automation webhooks live and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoints: Endpoints::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SiteConfig {
    /// Defaults, then `axis.toml` in the working directory if present, then
    /// environment overrides.
    pub fn load() -> Self {
        let mut config = Self::default();

        if Path::new(CONFIG_FILE_PATH).exists() {
            match Self::from_file(CONFIG_FILE_PATH) {
                Ok(file_config) => config = file_config,
                Err(e) => log::warn!("Ignoring {}: {}", CONFIG_FILE_PATH, e),
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Apply overrides from a key lookup (the process environment in `load`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.base_url = base_url.trim().to_string();
            }
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => log::warn!("Ignoring invalid {}={:?}", TIMEOUT_ENV, raw),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn contact_url(&self) -> Result<Url, ConfigError> {
        self.endpoint_url(&self.endpoints.contact)
    }

    pub fn subscribe_url(&self) -> Result<Url, ConfigError> {
        self.endpoint_url(&self.endpoints.subscribe)
    }

    pub fn chat_url(&self) -> Result<Url, ConfigError> {
        self.endpoint_url(&self.endpoints.chat)
    }

    pub fn health_url(&self) -> Result<Url, ConfigError> {
        self.endpoint_url("/health")
    }

    /// Base URL and path are concatenated, so a base with its own path prefix
    /// keeps it.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
        let base = self.base_url.trim_end_matches('/');
        let raw = if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        };
        let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidUrl {
                url: raw,
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }
}
