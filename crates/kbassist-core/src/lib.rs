//! # kbassist-core
//!
//! Core types, traits, and response adaptation for the kbassist knowledge-base
//! assistant.
//!
//! This crate holds the data model shared by the inference and API crates,
//! the [`GenerationBackend`] seam, and the [`adapter`] functions that reshape
//! upstream record-store payloads into the canonical outward schema.

pub mod adapter;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

pub use adapter::{
    adapt_auth, adapt_paginated, adapt_project_detail, adapt_sample_detail, adapt_task_detail,
    handle_api_error, normalize_keys, to_camel_case, AuthData, AuthUser, PageData,
    UpstreamError,
};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
