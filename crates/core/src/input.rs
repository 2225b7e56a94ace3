//! Keyboard handling for the text input

use serde::{Deserialize, Serialize};

/// A key press in the input area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name as reported by the platform (`"Enter"`, `"a"`, ...)
    pub key: String,
    /// Shift modifier held
    #[serde(default)]
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, shift: bool) -> Self {
        Self {
            key: key.into(),
            shift,
        }
    }
}

/// What the caller should do with a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Suppress the key's default effect and submit
    Submit,
    /// Let the key through untouched
    PassThrough,
}

impl KeyAction {
    /// Whether the platform's default handling (newline insertion) is suppressed
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Submit)
    }
}

/// Enter without Shift submits; everything else passes through.
pub fn handle_key(event: &KeyEvent) -> KeyAction {
    if event.key == "Enter" && !event.shift {
        KeyAction::Submit
    } else {
        KeyAction::PassThrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_submits() {
        let action = handle_key(&KeyEvent::new("Enter", false));
        assert_eq!(action, KeyAction::Submit);
        assert!(action.prevents_default());
    }

    #[test]
    fn test_shift_enter_passes_through() {
        let action = handle_key(&KeyEvent::new("Enter", true));
        assert_eq!(action, KeyAction::PassThrough);
        assert!(!action.prevents_default());
    }

    #[test]
    fn test_other_keys_pass_through() {
        for key in ["a", "Tab", "Escape", "enter"] {
            assert_eq!(handle_key(&KeyEvent::new(key, false)), KeyAction::PassThrough);
        }
    }

    #[test]
    fn test_shift_defaults_to_false() {
        let event: KeyEvent = serde_json::from_str(r#"{"key":"Enter"}"#).unwrap();
        assert_eq!(handle_key(&event), KeyAction::Submit);
    }
}
