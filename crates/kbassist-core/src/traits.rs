//! Trait seams between the orchestration layer and external services.

use async_trait::async_trait;

use crate::{ChatMessage, Result};

/// Backend for text generation (LLM).
///
/// Implementations perform one request/response call per method invocation
/// and never retry.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for a single prompt, with an optional system role.
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String>;

    /// Generate the next assistant turn for a conversation.
    async fn chat(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}
