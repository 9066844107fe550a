//! The single choke point for calls to the generation backend.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use kbassist_core::logging::{DURATION_MS, ERROR_MSG, RESPONSE_LEN};
use kbassist_core::{GenerationBackend, GenerationOutcome};

use crate::prompts::{Prompt, PromptBody};

/// Wraps a [`GenerationBackend`] and turns every failure into
/// [`GenerationOutcome::Failed`]. One call in, one outcome out, no retries.
#[derive(Clone)]
pub struct GenerationGateway {
    backend: Arc<dyn GenerationBackend>,
}

impl GenerationGateway {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Probe the backend; an erroring probe reads as unreachable.
    pub async fn is_reachable(&self) -> bool {
        self.backend.health_check().await.unwrap_or(false)
    }

    /// Execute one prompt against the backend.
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "gateway", op = "generate", model = %self.backend.model_name(), prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &Prompt) -> GenerationOutcome {
        let start = Instant::now();
        let system = prompt.system.as_deref();

        let result = match &prompt.body {
            PromptBody::Text(text) => self.backend.generate(system, text).await,
            PromptBody::Conversation(messages) => self.backend.chat(system, messages).await,
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                debug!(
                    { RESPONSE_LEN } = text.len(),
                    { DURATION_MS } = duration_ms,
                    "Generation succeeded"
                );
                GenerationOutcome::Ok { text }
            }
            Err(e) => {
                warn!({ ERROR_MSG } = %e, { DURATION_MS } = duration_ms, "Generation failed");
                GenerationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
