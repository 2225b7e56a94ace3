//! Language model completion trait

use async_trait::async_trait;

use crate::Result;

/// Hosted completion service
///
/// Implementations:
/// - `ClaudeBackend` - Anthropic Messages API
///
/// # Example
///
/// ```ignore
/// let backend: Arc<dyn CompletionBackend> = Arc::new(ClaudeBackend::new(config)?);
/// let raw = backend.complete(&build_translation_prompt("hello")).await?;
/// let translation = parse_translation(&raw)?;
/// ```
#[async_trait]
pub trait CompletionBackend: Send + Sync + 'static {
    /// Send `prompt` as a single user message and return the reply text.
    ///
    /// Exactly one request per call, no retries. Non-success statuses map to
    /// `RequestFailed`, envelope problems to `MalformedResponse`.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
