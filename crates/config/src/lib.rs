//! Configuration management for the translator
//!
//! Supports loading configuration from:
//! - TOML/YAML files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (`TRANSLATOR__` prefix, `__` between sections)
//! - `ANTHROPIC_API_KEY` for the completion service key

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, LlmSettings, ObservabilityConfig, RuntimeEnvironment, ServerConfig,
    SessionSettings, Settings, SpeechSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::MissingField(key),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}
