//! Collaborator traits
//!
//! The session talks to the outside world through two seams:
//!
//! ```text
//!   CompletionBackend:  prompt -> raw model reply (hosted language model)
//!   SpeechSynthesizer:  utterance -> completion handle (platform speech)
//! ```
//!
//! Both are object safe so servers can hold them as `Arc<dyn _>` and tests
//! can swap in mocks.

mod llm;
mod speech;

pub use llm::CompletionBackend;
pub use speech::{SpeechCompletion, SpeechHandle, SpeechOutcome, SpeechSynthesizer, Utterance};
