//! Core types for the English to Spanish translator
//!
//! This crate has no I/O of its own:
//! - Translator session state machine and request dispatcher
//! - Prompt builder and response parser
//! - Keyboard handling for the input area
//! - Collaborator traits (completion backend, speech synthesis)
//! - Error types

pub mod dispatcher;
pub mod error;
pub mod input;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod traits;
pub mod translation;
pub mod voice_config;

pub use dispatcher::RequestDispatcher;
pub use error::{Result, TranslateError, EMPTY_INPUT_MESSAGE, TRANSLATION_FAILED_MESSAGE};
pub use input::{handle_key, KeyAction, KeyEvent};
pub use parser::{parse_translation, strip_code_fences};
pub use prompt::build_translation_prompt;
pub use session::{Resolution, SessionState, SessionStats, TranslatorSession};
pub use translation::Translation;
pub use voice_config::VoiceConfig;

// Trait re-exports
pub use traits::{
    CompletionBackend, SpeechCompletion, SpeechHandle, SpeechOutcome, SpeechSynthesizer,
    Utterance,
};
