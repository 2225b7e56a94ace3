//! Main settings module

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{endpoints, llm, sessions, speech};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion service configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Speech configuration
    #[serde(default)]
    pub speech: SpeechSettings,

    /// Session manager configuration
    #[serde(default)]
    pub sessions: SessionSettings,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds. Must exceed `llm.timeout_seconds`.
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,

    /// Restrict CORS to `cors_origins` (false = permissive, development only)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    90
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_request_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum reply tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// API key; falls back to `ANTHROPIC_API_KEY`
    #[serde(default = "default_api_key", skip_serializing)]
    pub api_key: Option<String>,

    /// HTTP client timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,

    /// `anthropic-version` header
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
}

fn default_endpoint() -> String {
    endpoints::ANTHROPIC_DEFAULT.to_string()
}

fn default_model() -> String {
    llm::DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> usize {
    llm::DEFAULT_MAX_TOKENS
}

fn default_api_key() -> Option<String> {
    std::env::var(llm::API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

fn default_llm_timeout() -> u64 {
    llm::DEFAULT_TIMEOUT_SECS
}

fn default_anthropic_version() -> String {
    llm::ANTHROPIC_VERSION.to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key: default_api_key(),
            timeout_seconds: default_llm_timeout(),
            anthropic_version: default_anthropic_version(),
        }
    }
}

impl LlmSettings {
    /// Configured key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// BCP-47 language tag
    #[serde(default = "default_language")]
    pub language: String,

    /// Rate multiplier (1.0 = synthesizer default)
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Seconds to wait for the browser to report an utterance outcome
    #[serde(default = "default_ack_timeout")]
    pub ack_timeout_seconds: u64,
}

fn default_language() -> String {
    speech::DEFAULT_LANGUAGE.to_string()
}

fn default_rate() -> f32 {
    speech::DEFAULT_RATE
}

fn default_ack_timeout() -> u64 {
    speech::DEFAULT_ACK_TIMEOUT_SECS
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            rate: default_rate(),
            ack_timeout_seconds: default_ack_timeout(),
        }
    }
}

/// Session manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle seconds before a session expires
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// Seconds between expiry sweeps
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

fn default_max_sessions() -> usize {
    sessions::DEFAULT_MAX_SESSIONS
}

fn default_idle_timeout() -> u64 {
    sessions::DEFAULT_IDLE_TIMEOUT_SECS
}

fn default_cleanup_interval() -> u64 {
    sessions::DEFAULT_CLEANUP_INTERVAL_SECS
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_seconds: default_idle_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Serve Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_llm()?;
        self.validate_speech()?;
        self.validate_sessions()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "Port must be non-zero"));
        }
        if self.server.timeout_seconds <= self.llm.timeout_seconds {
            return Err(invalid(
                "server.timeout_seconds",
                format!(
                    "Must exceed llm.timeout_seconds ({}), got {}",
                    self.llm.timeout_seconds, self.server.timeout_seconds
                ),
            ));
        }
        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        let llm_settings = &self.llm;

        if !(llm_settings.endpoint.starts_with("http://")
            || llm_settings.endpoint.starts_with("https://"))
        {
            return Err(invalid(
                "llm.endpoint",
                format!("Must be an http(s) URL, got '{}'", llm_settings.endpoint),
            ));
        }

        if llm_settings.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }

        if !(1..=llm::MAX_TOKENS_LIMIT).contains(&llm_settings.max_tokens) {
            return Err(invalid(
                "llm.max_tokens",
                format!(
                    "Must be between 1 and {}, got {}",
                    llm::MAX_TOKENS_LIMIT,
                    llm_settings.max_tokens
                ),
            ));
        }

        if llm_settings.timeout_seconds == 0 {
            return Err(invalid("llm.timeout_seconds", "Must be greater than 0"));
        }

        if self.environment.is_production() && llm_settings.api_key().is_none() {
            return Err(ConfigError::MissingField(format!(
                "llm.api_key (or {})",
                llm::API_KEY_ENV
            )));
        }

        Ok(())
    }

    fn validate_speech(&self) -> Result<(), ConfigError> {
        if self.speech.language.trim().is_empty() {
            return Err(ConfigError::MissingField("speech.language".to_string()));
        }

        if !(speech::MIN_RATE..=speech::MAX_RATE).contains(&self.speech.rate) {
            return Err(invalid(
                "speech.rate",
                format!(
                    "Must be between {} and {}, got {}",
                    speech::MIN_RATE,
                    speech::MAX_RATE,
                    self.speech.rate
                ),
            ));
        }

        if self.speech.ack_timeout_seconds == 0 {
            return Err(invalid("speech.ack_timeout_seconds", "Must be greater than 0"));
        }

        Ok(())
    }

    fn validate_sessions(&self) -> Result<(), ConfigError> {
        if self.sessions.max_sessions == 0 {
            return Err(invalid("sessions.max_sessions", "Must be greater than 0"));
        }
        if self.sessions.idle_timeout_seconds == 0 {
            return Err(invalid("sessions.idle_timeout_seconds", "Must be greater than 0"));
        }
        if self.sessions.cleanup_interval_seconds == 0 {
            return Err(invalid(
                "sessions.cleanup_interval_seconds",
                "Must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (`TRANSLATOR__SECTION__KEY`)
/// 2. config/{env}.toml|yaml (if env specified)
/// 3. config/default.toml|yaml
/// 4. Built-in defaults
///
/// Missing files are skipped. A file that fails to parse or validate is an
/// error.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// [`load_settings`] reading files from `dir` instead of `config/`
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    build_settings(layered_builder(dir, env, env_overrides()))
}

fn env_overrides() -> Environment {
    Environment::with_prefix("TRANSLATOR")
        .separator("__")
        .try_parsing(true)
}

fn layered_builder(
    dir: &Path,
    env: Option<&str>,
    overrides: Environment,
) -> ConfigBuilder<DefaultState> {
    let mut builder = Config::builder();

    builder = builder.add_source(file_source(dir, "default"));

    if let Some(env_name) = env {
        builder = builder.add_source(file_source(dir, env_name));
    }

    builder.add_source(overrides)
}

fn file_source(dir: &Path, name: &str) -> File<config::FileSourceFile, config::FileFormat> {
    File::with_name(&dir.join(name).to_string_lossy()).required(false)
}

fn build_settings(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
