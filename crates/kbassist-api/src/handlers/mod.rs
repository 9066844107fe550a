//! HTTP handlers for kbassist-api.

pub mod health;
pub mod knowledge;
