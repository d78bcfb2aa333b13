//! Explicit runtime configuration.
//!
//! Settings are read once at startup (process environment plus an optional
//! `.env` file) into a [`Config`] value that is handed to the client and the
//! orchestrator. Nothing below this module reads the environment.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::error::{InsightError, Result};

/// Environment variable holding the provider credential.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model identifier.
pub const MODEL_ENV_VAR: &str = "IMAGE_INSIGHTS_MODEL";
/// Environment variable overriding the chat-completions base URL.
pub const BASE_URL_ENV_VAR: &str = "IMAGE_INSIGHTS_BASE_URL";
/// Environment variable setting a request timeout in seconds.
pub const TIMEOUT_ENV_VAR: &str = "IMAGE_INSIGHTS_TIMEOUT_SECS";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini/gemini-2.0-flash-exp";
/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Validated settings shared by the client and the orchestrator.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    /// Model identifier, optionally prefixed with its provider (`gemini/...`)
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// No timeout unless set
    pub timeout: Option<Duration>,
}

// The credential is never printed
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Build a config with defaults around the given credential.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::ConfigurationError`] when the credential is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(missing_api_key());
        }
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            max_tokens: None,
            timeout: None,
        })
    }

    /// Load `.env` (if present) and then read the process environment.
    #[instrument(name = "config_load")]
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) => debug!(error = %e, "No .env file loaded"),
        }
        Self::from_env()
    }

    /// Read the configuration from the process environment only.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::ConfigurationError`] when `GEMINI_API_KEY` is unset
    /// or empty, or when the timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV_VAR).unwrap_or_default();
        let mut config = Self::new(api_key)?;

        if let Some(model) = lookup(MODEL_ENV_VAR).filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(base_url) = lookup(BASE_URL_ENV_VAR).filter(|u| !u.trim().is_empty()) {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV_VAR).filter(|t| !t.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                InsightError::ConfigurationError(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    TIMEOUT_ENV_VAR, raw
                ))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        info!(model = %config.model, base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the base URL (no trailing slash).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub(crate) fn missing_api_key() -> InsightError {
    InsightError::ConfigurationError(format!(
        "{} is missing. Please set it in your environment.",
        API_KEY_ENV_VAR
    ))
}
