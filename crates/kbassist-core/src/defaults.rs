//! Centralized default constants for kbassist.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers or user-facing strings.

// =============================================================================
// GENERATION
// =============================================================================

/// Model identifier sent with every generation request.
pub const GEN_MODEL: &str = "anthropic/claude-sonnet-4-20250514";

/// Default OpenAI-compatible gateway endpoint.
pub const GATEWAY_URL: &str = "https://ai-gateway.vercel.sh/v1";

/// Timeout for the health probe only (seconds). Generation uses the transport default.
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// RANKING
// =============================================================================

/// Maximum number of recommended article ids.
pub const RECOMMEND_LIMIT: usize = 5;

/// Maximum number of ranked search ids.
pub const SEARCH_LIMIT: usize = 10;

// =============================================================================
// PAGINATION
// =============================================================================

/// Page number used when the upstream payload omits it.
pub const PAGE: u64 = 1;

/// Page size used when the upstream payload omits it.
pub const PAGE_SIZE: u64 = 20;

// =============================================================================
// ENVELOPE
// =============================================================================

/// Success code in the canonical envelope.
pub const ENVELOPE_OK_CODE: u16 = 200;

/// Success message in the canonical envelope.
pub const ENVELOPE_OK_MESSAGE: &str = "success";

/// Error code when the upstream error carries no status.
pub const ENVELOPE_ERROR_CODE: u16 = 500;

/// Error message when the upstream error carries no detail.
pub const ENVELOPE_ERROR_MESSAGE: &str = "请求失败";

// =============================================================================
// DEGRADED RESPONSES
// =============================================================================

/// Placeholder returned by assist-write and chat when generation fails.
pub const AI_UNAVAILABLE_MESSAGE: &str = "抱歉，AI 服务暂时不可用。请稍后重试。";

/// Placeholder returned by summarize when generation fails.
pub const SUMMARY_FAILED_MESSAGE: &str = "摘要生成失败，请稍后重试。";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default maximum request body size in bytes.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_limits() {
        assert_eq!(RECOMMEND_LIMIT, 5);
        assert_eq!(SEARCH_LIMIT, 10);
    }

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(PAGE, 1);
        assert_eq!(PAGE_SIZE, 20);
    }
}
