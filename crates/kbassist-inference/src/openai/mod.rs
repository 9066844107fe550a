//! OpenAI-compatible generation backend.
//!
//! Talks to any endpoint implementing `POST /chat/completions`, including the
//! hosted AI gateway used in production and local servers such as Ollama in
//! OpenAI compatibility mode.
//!
//! # Example
//!
//! ```rust,no_run
//! use kbassist_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use kbassist_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::new(OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(),
//!         api_key: None,
//!     })
//!     .unwrap();
//!     let text = backend.generate(None, "你好").await.unwrap();
//!     println!("{}", text);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig};
pub use error::OpenAIErrorCode;
pub use types::*;
