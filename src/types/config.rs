//! Configuration types
//!
//! Caller-facing options for the catalog client and chooser session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::model::ModelInfo;

pub const DEFAULT_API_ENDPOINT: &str = "https://openrouter.ai/api/v1/models";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_HEIGHT: &str = "80vh";
pub const DEFAULT_MAX_WIDTH: &str = "1200px";

/// Presentation theme hint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(ConfigError::InvalidTheme(other.to_string())),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("Invalid theme: {0}")]
    InvalidTheme(String),
}

/// Chooser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChooserConfig {
    /// Models listing endpoint
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    /// Completion endpoint used by the connectivity probe
    #[serde(default = "default_chat_endpoint")]
    pub chat_endpoint: String,
    /// `None` uses the built-in list; an empty list disables fallback
    #[serde(default)]
    pub fallback_models: Option<Vec<ModelInfo>>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_max_height")]
    pub max_height: String,
    #[serde(default = "default_max_width")]
    pub max_width: String,
    /// Split loaded models into free/paid partitions
    #[serde(default = "default_categorize")]
    pub categorize: bool,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Timeout for the listing fetch only
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

fn default_chat_endpoint() -> String {
    DEFAULT_CHAT_ENDPOINT.to_string()
}

fn default_max_height() -> String {
    DEFAULT_MAX_HEIGHT.to_string()
}

fn default_max_width() -> String {
    DEFAULT_MAX_WIDTH.to_string()
}

fn default_categorize() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ChooserConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            chat_endpoint: default_chat_endpoint(),
            fallback_models: None,
            theme: Theme::default(),
            max_height: default_max_height(),
            max_width: default_max_width(),
            categorize: default_categorize(),
            cache_ttl_secs: default_cache_ttl(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ChooserConfig {
    /// Point the client at a different listing endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    pub fn with_chat_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.chat_endpoint = endpoint.into();
        self
    }

    pub fn with_fallback_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.fallback_models = Some(models);
        self
    }

    /// Defaults overlaid with `MODEL_CHOOSER_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("MODEL_CHOOSER_ENDPOINT") {
            config.api_endpoint = endpoint;
        }
        if let Some(endpoint) = lookup("MODEL_CHOOSER_CHAT_ENDPOINT") {
            config.chat_endpoint = endpoint;
        }
        if let Some(theme) = lookup("MODEL_CHOOSER_THEME") {
            match theme.parse() {
                Ok(theme) => config.theme = theme,
                Err(e) => tracing::warn!("Ignoring MODEL_CHOOSER_THEME: {}", e),
            }
        }

        config.validate();
        config
    }

    /// Repair values that would leave the chooser unusable
    pub fn validate(&mut self) {
        if self.api_endpoint.trim().is_empty() {
            self.api_endpoint = default_api_endpoint();
        }
        if self.chat_endpoint.trim().is_empty() {
            self.chat_endpoint = default_chat_endpoint();
        }
        if self.max_height.trim().is_empty() {
            self.max_height = default_max_height();
        }
        if self.max_width.trim().is_empty() {
            self.max_width = default_max_width();
        }
        if self.cache_ttl_secs == 0 {
            tracing::warn!("cache_ttl_secs of 0 is not allowed, using {}", DEFAULT_CACHE_TTL_SECS);
            self.cache_ttl_secs = DEFAULT_CACHE_TTL_SECS;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
        }
    }

    /// Reject endpoints that are not absolute http(s) URLs
    pub fn check(&self) -> Result<(), ConfigError> {
        check_endpoint(&self.api_endpoint)?;
        check_endpoint(&self.chat_endpoint)
    }
}

fn check_endpoint(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidEndpoint {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidEndpoint {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

/// Probe credential from `OPENROUTER_API_KEY`, if set and non-blank
pub fn credential_from_env() -> Option<String> {
    std::env::var("OPENROUTER_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}
