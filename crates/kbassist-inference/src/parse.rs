//! Structural validation of untrusted model output.
//!
//! Model text is never trusted on read: list-producing operations accept
//! only a bare JSON array of strings and reject everything else outright.

use thiserror::Error;

use kbassist_core::{Error, RankedIdList};

/// The model output did not satisfy the JSON-array-of-strings contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("empty model output")]
    Empty,
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("model output is not a JSON array of strings")]
    NotStringArray,
}

impl From<ParseFailure> for Error {
    fn from(failure: ParseFailure) -> Self {
        Error::UnparseableOutput(failure.to_string())
    }
}

/// Parse an identifier list from raw model output.
///
/// Surrounding whitespace is trimmed. Anything other than a JSON array whose
/// elements are all strings is a [`ParseFailure`]; there is no partial parse.
pub fn parse_identifier_list(raw: &str) -> Result<RankedIdList, ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::Empty);
    }

    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|e| ParseFailure::InvalidJson(e.to_string()))?;

    let items = value.as_array().ok_or(ParseFailure::NotStringArray)?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(ParseFailure::NotStringArray)
        })
        .collect()
}

/// Pass-through output for free-text operations: trimmed, otherwise untouched.
pub fn parse_plain_text(raw: &str) -> String {
    raw.trim().to_string()
}
