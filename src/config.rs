//! Configuration types, built from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::pipeline::classify::MatchMode;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528:free";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Settings for the chat-completion API used to draft replies.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: SecretString,
    /// Full chat-completions endpoint URL.
    pub api_url: String,
    pub model: String,
    /// Sampling temperature. Kept low so suggestions stay close to deterministic.
    pub temperature: f32,
    /// Cap on generated tokens.
    pub max_tokens: u32,
    /// Bound on the single outbound request.
    pub timeout: Duration,
}

impl LlmConfig {
    /// Config with the default endpoint and sampling parameters.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 300,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build config from environment variables.
    ///
    /// `DS_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("DS_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("DS_API_KEY".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("DS_API_URL") {
            config.api_url = url;
        }
        if let Ok(model) = std::env::var("DS_MODEL_ID") {
            config.model = model;
        }
        config.temperature = parse_env("DS_TEMPERATURE", config.temperature)?;
        config.max_tokens = parse_env("DS_MAX_TOKENS", config.max_tokens)?;
        config.timeout = Duration::from_secs(parse_env("DS_TIMEOUT_SECS", 60u64)?);

        Ok(config)
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub match_mode: MatchMode,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_raw = std::env::var("CLASSIFIER_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                key: "CLASSIFIER_BIND".to_string(),
                message: format!("{bind_raw}: {e}"),
            })?;

        let match_mode = parse_env("CLASSIFIER_MATCH_MODE", MatchMode::default())?;

        Ok(Self {
            bind,
            match_mode,
            llm: LlmConfig::from_env()?,
        })
    }
}

/// Read and parse an optional environment variable, falling back to `default`
/// when unset. A set-but-unparseable value is an error rather than silently
/// ignored.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw}: {e}"),
            }),
        Err(_) => Ok(default),
    }
}
