//! # kbassist-inference
//!
//! AI orchestration for kbassist.
//!
//! This crate provides:
//! - Prompt construction for every assistant operation ([`prompts`])
//! - The generation gateway, the only caller of the backend ([`gateway`])
//! - Strict parsing of untrusted model output ([`parse`])
//! - Deterministic fallback ranking ([`ranking`])
//! - The operation facade composing all of the above ([`assistant`])
//! - An OpenAI-compatible HTTP backend ([`openai`])
//!
//! # Feature Flags
//!
//! - `mock`: expose [`mock::MockGenerationBackend`] to downstream test suites

pub mod assistant;
pub mod gateway;
pub mod openai;
pub mod parse;
pub mod prompts;
pub mod ranking;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use assistant::{KnowledgeAssistant, RankedReply, TextReply};
pub use gateway::GenerationGateway;
pub use openai::{OpenAIBackend, OpenAIConfig};
pub use parse::{parse_identifier_list, parse_plain_text, ParseFailure};
pub use prompts::{build_prompt, Prompt, PromptBody};
pub use ranking::{rank_by_query_match, rank_by_tag_overlap, reconcile_ids, Reconciled};
