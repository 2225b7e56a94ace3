//! Translation result type

use serde::{Deserialize, Serialize};

/// Spanish text and its pronunciation guide for English speakers.
///
/// Produced whole by one successful request cycle and never edited in place;
/// a newer result replaces it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    spanish: String,
    phonetic: String,
}

impl Translation {
    pub fn new(spanish: impl Into<String>, phonetic: impl Into<String>) -> Self {
        Self {
            spanish: spanish.into(),
            phonetic: phonetic.into(),
        }
    }

    /// Spanish translation
    pub fn spanish(&self) -> &str {
        &self.spanish
    }

    /// Hyphenated phonetic guide, e.g. `O-la`
    pub fn phonetic(&self) -> &str {
        &self.phonetic
    }
}
