//! Gateway error classification.

use kbassist_core::Error;

/// Classification of a non-success gateway response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Bad or missing API key.
    AuthenticationError,
    RateLimitExceeded,
    /// The fixed model id is not served by this gateway.
    ModelNotFound,
    ContextLengthExceeded,
    ServerError,
    Unknown,
}

impl OpenAIErrorCode {
    /// Classify from HTTP status and the body's `error.type`.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) | (403, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Stable value for the `error_code` log field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationError => "authentication",
            Self::RateLimitExceeded => "rate_limit",
            Self::ModelNotFound => "model_not_found",
            Self::ContextLengthExceeded => "context_length",
            Self::ServerError => "server_error",
            Self::Unknown => "unknown",
        }
    }

    /// Deployment faults that persist until an operator changes configuration.
    /// Logged at ERROR; everything else is a per-request WARN.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(self, Self::AuthenticationError | Self::ModelNotFound)
    }

    /// Build the error returned to the gateway.
    pub fn into_error(self, status: u16, message: &str) -> Error {
        let detail = format!("{} ({}): {}", self.as_str(), status, message);
        if self.is_misconfiguration() {
            Error::Config(detail)
        } else {
            Error::Inference(detail)
        }
    }
}
