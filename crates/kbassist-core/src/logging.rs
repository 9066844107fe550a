//! Structured logging field names shared by every kbassist crate.
//!
//! Event macros take these as constant field names (`{ OPERATION } = op`);
//! `#[instrument]` spans spell the same names literally.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Misconfigured gateway (bad key, unknown model), upstream data errors |
//! | WARN  | Fallback taken: generation failed, output unparseable, ids dropped |
//! | INFO  | Lifecycle events (startup, backend configured) |
//! | DEBUG | Decision points, generation timings |

/// Default `EnvFilter` directives when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str =
    "kbassist_api=debug,kbassist_inference=debug,kbassist_core=info,tower_http=debug";

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the event: "api", "inference", "adapter".
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem: "gateway", "openai", "assistant".
pub const COMPONENT: &str = "component";

/// Operation name: "assist_write", "chat", "recommend", "search", "summarize".
pub const OPERATION: &str = "op";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model identifier sent to the gateway.
pub const MODEL: &str = "model";

/// Byte length of the prompt body.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of the model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Gateway error classification, see `OpenAIErrorCode`.
pub const ERROR_CODE: &str = "error_code";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of ids returned by a ranking operation.
pub const RESULT_COUNT: &str = "result_count";

/// Number of proposed ids absent from the corpus.
pub const UNKNOWN_COUNT: &str = "unknown";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether deterministic ranking replaced model output.
pub const FALLBACK: &str = "fallback";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_match_span_fields() {
        // #[instrument] attributes spell these literally
        assert_eq!(SUBSYSTEM, "subsystem");
        assert_eq!(COMPONENT, "component");
        assert_eq!(OPERATION, "op");
        assert_eq!(MODEL, "model");
        assert_eq!(PROMPT_LEN, "prompt_len");
    }

    #[test]
    fn test_default_filter_covers_every_crate() {
        for target in ["kbassist_api", "kbassist_inference", "kbassist_core", "tower_http"] {
            assert!(
                DEFAULT_FILTER
                    .split(',')
                    .any(|d| d.split('=').next() == Some(target)),
                "missing directive for {}",
                target
            );
        }
    }
}
