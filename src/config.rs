//! Configuration loading for prom2grafana.
//!
//! All settings come from the process environment. An empty variable is
//! treated the same as an unset one.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};

/// Environment variable holding the listen port.
pub const PORT_VAR: &str = "PORT";
/// Environment variable holding the log level.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
/// Environment variable holding the provider API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the provider base URL.
pub const API_URL_VAR: &str = "OPENAI_API_URL";
/// Environment variable holding a single model identifier.
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Environment variable holding a comma-separated fallback list of models.
pub const MODELS_VAR: &str = "OPENAI_MODELS";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub provider: ProviderConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Port to listen on; the server binds all interfaces.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    pub level: String,
}

/// Completion provider configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderConfig {
    /// API key sent as a bearer token
    pub api_key: ApiKey,
    /// Base URL of an OpenAI-compatible API (e.g., "https://openrouter.ai/api/v1")
    pub base_url: String,
    /// Single model identifier, used when no fallback list is configured
    pub model: String,
    /// Raw comma-separated fallback list, if configured
    pub models: Option<String>,
}

/// API key wrapper that redacts in Debug/Display/Serialize and zeroizes on drop.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Access the raw key value. Every call site is auditable via `grep expose_secret`.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(SecretString::from(s))
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey(SecretString::from(s))
    }
}

/// Ordered list of models to try, highest priority first.
///
/// Never empty. Duplicates are kept: listing a model twice tries it twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCandidates(Vec<String>);

impl ModelCandidates {
    /// Resolve the candidate list from the raw settings.
    ///
    /// A non-empty `models` list wins over `model`. Entries are trimmed and
    /// blank entries dropped; if nothing is left, `model` is used.
    pub fn resolve(models: Option<&str>, model: &str) -> Self {
        let listed: Vec<String> = models
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        if listed.is_empty() {
            Self(vec![model.to_string()])
        } else {
            Self(listed)
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// The highest-priority model and the fallbacks after it.
    pub fn split_first(&self) -> (&str, &[String]) {
        match self.0.split_first() {
            Some((first, rest)) => (first.as_str(), rest),
            None => (DEFAULT_MODEL, &[]),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ModelCandidates {
    /// Collect an explicit list. An empty iterator yields the default model.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let models: Vec<String> = iter.into_iter().map(Into::into).collect();
        if models.is_empty() {
            Self(vec![DEFAULT_MODEL.to_string()])
        } else {
            Self(models)
        }
    }
}

impl std::fmt::Display for ModelCandidates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using a custom lookup function.
    ///
    /// The closure-based design makes this testable without touching global env state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;

        let port = match get(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw.clone() })?,
            None => DEFAULT_PORT,
        };

        let config = Config {
            server: ServerConfig { port },
            logging: LoggingConfig {
                level: get(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            provider: ProviderConfig {
                api_key: ApiKey::from(api_key),
                base_url: get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                models: get(MODELS_VAR),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.provider.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "{} must be an http(s) URL, got '{}'",
                API_URL_VAR, url
            )));
        }
        Ok(())
    }

    /// Resolve the ordered fallback list of models.
    pub fn candidates(&self) -> ModelCandidates {
        ModelCandidates::resolve(self.provider.models.as_deref(), &self.provider.model)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set; an API key is required to reach the completion provider")]
    MissingApiKey,

    #[error("Invalid PORT value '{value}': expected a number between 0 and 65535")]
    InvalidPort { value: String },

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
