//! Default values shared across the translator crates

/// Completion service endpoints
pub mod endpoints {
    /// Anthropic API base URL
    pub const ANTHROPIC_DEFAULT: &str = "https://api.anthropic.com";

    /// Messages API path, appended to the base URL
    pub const MESSAGES_PATH: &str = "/v1/messages";
}

/// Completion request defaults
pub mod llm {
    /// Model identifier sent with every request
    pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

    /// Upper bound on reply tokens
    pub const DEFAULT_MAX_TOKENS: usize = 1000;

    /// Largest accepted `max_tokens`
    pub const MAX_TOKENS_LIMIT: usize = 8192;

    /// `anthropic-version` header value
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";

    /// HTTP client timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Environment variable consulted when no key is configured
    pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
}

/// Speech defaults (European Spanish, slower than normal)
pub mod speech {
    pub const DEFAULT_LANGUAGE: &str = "es-ES";
    pub const DEFAULT_RATE: f32 = 0.8;
    pub const MIN_RATE: f32 = 0.1;
    pub const MAX_RATE: f32 = 10.0;

    /// How long the browser has to report an utterance outcome
    pub const DEFAULT_ACK_TIMEOUT_SECS: u64 = 120;
}

/// Session manager defaults
pub mod sessions {
    pub const DEFAULT_MAX_SESSIONS: usize = 1000;
    pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 3600;
    pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;
}
