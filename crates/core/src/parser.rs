//! Response parsing
//!
//! Models are told to answer with a bare JSON object but often wrap it in a
//! markdown code block anyway. The fence is stripped before strict parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::{Result, TranslateError, Translation};

/// Opening fence with an optional language tag (```` ```json ````)
static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*```[\w+-]*[ \t]*\r?\n?").unwrap());

/// Closing fence, optionally preceded by a line break
static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n?[ \t]*```\s*$").unwrap());

#[derive(Debug, Deserialize)]
struct RawTranslation {
    spanish: String,
    phonetic: String,
}

/// Remove a surrounding markdown code fence and trim whitespace.
///
/// Text without a fence is only trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let start = OPENING_FENCE.find(raw).map(|m| m.end()).unwrap_or(0);
    let body = &raw[start..];
    let end = CLOSING_FENCE
        .find(body)
        .map(|m| m.start())
        .unwrap_or(body.len());
    body[..end].trim()
}

/// Parse a model reply into a [`Translation`].
///
/// The unfenced payload must be a JSON object carrying both `spanish` and
/// `phonetic` as strings. Anything else is [`TranslateError::MalformedResponse`].
/// Extra fields are ignored.
pub fn parse_translation(raw: &str) -> Result<Translation> {
    let payload = strip_code_fences(raw);

    let value: serde_json::Value = serde_json::from_str(payload)?;
    if !value.is_object() {
        return Err(TranslateError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    }

    let parsed: RawTranslation = serde_json::from_value(value)?;
    Ok(Translation::new(parsed.spanish, parsed.phonetic))
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
