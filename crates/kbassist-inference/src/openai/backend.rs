//! OpenAI-compatible generation backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};

use kbassist_core::logging::{DURATION_MS, ERROR_CODE, RESPONSE_LEN};
use kbassist_core::{defaults, ChatMessage, Error, GenerationBackend, Result};

use super::error::OpenAIErrorCode;
use super::types::*;

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GATEWAY_URL.to_string(),
            api_key: None,
        }
    }
}

impl OpenAIConfig {
    /// Read `AI_GATEWAY_BASE_URL` and `AI_GATEWAY_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("AI_GATEWAY_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| defaults::GATEWAY_URL.to_string()),
            api_key: std::env::var("AI_GATEWAY_API_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

/// Generation backend for any OpenAI-compatible chat completions endpoint.
///
/// The model is fixed to [`defaults::GEN_MODEL`]. No client timeout is set,
/// so a hung call is bounded only by the transport.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
    model: String,
}

impl OpenAIBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing OpenAI-compatible backend: url={}, model={}",
            config.base_url,
            defaults::GEN_MODEL
        );

        Ok(Self {
            client,
            config,
            model: defaults::GEN_MODEL.to_string(),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref api_key) => req.header("Authorization", format!("Bearer {}", api_key)),
            None => req,
        }
    }

    /// One chat completion call. A system message, when given, goes first.
    async fn complete(&self, system: Option<&str>, turns: &[ChatMessage]) -> Result<String> {
        let start = Instant::now();

        let mut messages = Vec::with_capacity(turns.len() + 1);
        if let Some(system) = system.filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::new("system", system));
        }
        messages.extend_from_slice(turns);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            stream: false,
        };

        let response = self
            .authorize(self.client.post(self.url("/chat/completions")))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (message, error_type) = match serde_json::from_str::<OpenAIErrorResponse>(&body) {
                Ok(parsed) => (parsed.error.message, parsed.error.error_type),
                Err(_) => (body, String::new()),
            };
            let code = OpenAIErrorCode::from_response(status.as_u16(), &error_type);
            if code.is_misconfiguration() {
                error!(
                    { ERROR_CODE } = code.as_str(),
                    status = status.as_u16(),
                    "Gateway rejected configuration"
                );
            } else {
                warn!(
                    { ERROR_CODE } = code.as_str(),
                    status = status.as_u16(),
                    "Gateway call failed"
                );
            }
            return Err(code.into_error(status.as_u16(), &message));
        }

        let body = response.text().await?;
        let result: ChatCompletionResponse = serde_json::from_str(&body)?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Inference("Response contained no choices".to_string()))?;

        debug!(
            { RESPONSE_LEN } = content.len(),
            { DURATION_MS } = start.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(content)
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "openai", op = "generate", model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        self.complete(system, &[ChatMessage::user(prompt)]).await
    }

    #[instrument(skip(self, system, messages), fields(subsystem = "inference", component = "openai", op = "chat", model = %self.model, turns = messages.len()))]
    async fn chat(&self, system: Option<&str>, messages: &[ChatMessage]) -> Result<String> {
        self.complete(system, messages).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .authorize(self.client.get(self.url("/models")))
            .timeout(Duration::from_secs(defaults::HEALTH_TIMEOUT_SECS))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                debug!("Gateway health check passed");
                Ok(true)
            }
            Ok(resp) => {
                warn!("Gateway health check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Gateway health check error: {}", e);
                Ok(false)
            }
        }
    }
}
