//! Voice configuration for speaking translations

use serde::{Deserialize, Serialize};

/// Lowest rate accepted by platform speech synthesizers
pub const MIN_RATE: f32 = 0.1;
/// Highest rate accepted by platform speech synthesizers
pub const MAX_RATE: f32 = 10.0;

/// Voice settings applied to every utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// BCP-47 language tag
    #[serde(default = "default_language")]
    pub language: String,
    /// Speaking rate multiplier (1.0 = synthesizer default)
    #[serde(default = "default_rate")]
    pub rate: f32,
}

fn default_language() -> String {
    "es-ES".to_string()
}

fn default_rate() -> f32 {
    0.8
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            rate: default_rate(),
        }
    }
}

impl VoiceConfig {
    /// Set the language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the speaking rate
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate.clamp(MIN_RATE, MAX_RATE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_config_default() {
        let config = VoiceConfig::default();
        assert_eq!(config.language, "es-ES");
        assert_eq!(config.rate, 0.8);
    }

    #[test]
    fn test_rate_clamping() {
        assert_eq!(VoiceConfig::default().with_rate(20.0).rate, MAX_RATE);
        assert_eq!(VoiceConfig::default().with_rate(0.0).rate, MIN_RATE);
        assert_eq!(VoiceConfig::default().with_rate(1.2).rate, 1.2);
    }
}
