//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let backend = MockGenerationBackend::new().with_fixed_response(r#"["a","b"]"#);
//! let failing = MockGenerationBackend::new().failing("backend offline");
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use kbassist_core::{ChatMessage, Error, GenerationBackend, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    response: String,
    failure: Option<String>,
}

/// One recorded backend invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// "generate" or "chat".
    pub operation: String,
    pub system: Option<String>,
    /// The prompt, or the last message for chat calls.
    pub input: String,
    /// Number of messages sent (1 for generate).
    pub turns: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            response: "Mock response".to_string(),
            failure: None,
        }
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a fixed response for generation requests.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).response = response.into();
        self
    }

    /// Make every call (including health checks) fail with this reason.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(reason.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of generation calls of either kind.
    pub fn generate_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn respond(&self, call: MockCall) -> Result<String> {
        self.call_log.lock().unwrap().push(call);
        match &self.config.failure {
            Some(reason) => Err(Error::Inference(reason.clone())),
            None => Ok(self.config.response.clone()),
        }
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        self.respond(MockCall {
            operation: "generate".to_string(),
            system: system.map(str::to_string),
            input: prompt.to_string(),
            turns: 1,
        })
    }

    async fn chat(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<String> {
        self.respond(MockCall {
            operation: "chat".to_string(),
            system: system.map(str::to_string),
            input: messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default(),
            turns: messages.len(),
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn health_check(&self) -> Result<bool> {
        match &self.config.failure {
            Some(reason) => Err(Error::Inference(reason.clone())),
            None => Ok(true),
        }
    }
}
