//! Upstream payload adaptation into the canonical outward schema.
//!
//! The record store speaks `snake_case` with its own pagination and auth
//! shapes. Everything leaving this service uses `camelCase` keys inside a
//! [`ResponseEnvelope`]. Missing upstream fields are never an error here:
//! each one resolves to a named default.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::{defaults, logging, ResponseEnvelope};

static SNAKE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([a-z])").expect("static regex"));

/// Rewrite one `snake_case` key to `camelCase`.
///
/// Only an underscore followed by a lowercase ASCII letter is folded, so
/// already-converted keys pass through untouched.
pub fn to_camel_case(key: &str) -> String {
    SNAKE_SEGMENT
        .replace_all(key, |caps: &Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Recursively rewrite every mapping key to `camelCase`.
///
/// Recurses into nested objects and arrays; scalars are returned unchanged.
/// Idempotent.
pub fn normalize_keys(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize_keys).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (to_camel_case(k), normalize_keys(v)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Loose truthiness matching the upstream client: null, false, 0 and ""
/// count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| is_present(v))
}

fn positive_u64(value: &Value, key: &str, default: u64) -> u64 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

// =============================================================================
// PAGINATION
// =============================================================================

/// One page of normalized records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub list: Vec<Value>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Adapt an upstream `{items, total, page, page_size}` payload.
pub fn adapt_paginated(upstream: &Value) -> ResponseEnvelope<PageData> {
    let list = upstream
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_keys).collect())
        .unwrap_or_default();

    ResponseEnvelope::success(PageData {
        list,
        total: upstream.get("total").and_then(Value::as_u64).unwrap_or(0),
        page: positive_u64(upstream, "page", defaults::PAGE),
        page_size: positive_u64(upstream, "page_size", defaults::PAGE_SIZE),
    })
}

// =============================================================================
// AUTH
// =============================================================================

/// User projection exposed after login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Value,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: String,
}

/// Token pair plus user projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Adapt an upstream login/refresh payload. An absent user status is "active".
pub fn adapt_auth(upstream: &Value) -> ResponseEnvelope<AuthData> {
    let user = upstream.get("user").unwrap_or(&Value::Null);

    let status = user
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("active")
        .to_string();

    ResponseEnvelope::success(AuthData {
        token: string_field(upstream, "access_token"),
        refresh_token: string_field(upstream, "refresh_token"),
        user: AuthUser {
            id: user.get("id").cloned().unwrap_or(Value::Null),
            name: string_field(user, "name"),
            email: string_field(user, "email"),
            role: string_field(user, "role"),
            status,
        },
    })
}

// =============================================================================
// ENTITY DETAIL
// =============================================================================

/// What to do when neither the normalized nor the upstream field is present.
#[derive(Debug, Clone, Copy)]
enum Fallback {
    Zero,
    Text(&'static str),
    Omit,
}

/// One denormalized display field.
struct Backfill {
    field: &'static str,
    source: &'static str,
    fallback: Fallback,
}

const PROJECT_FIELDS: &[Backfill] = &[
    Backfill {
        field: "sampleCount",
        source: "sample_count",
        fallback: Fallback::Zero,
    },
    Backfill {
        field: "taskCount",
        source: "task_count",
        fallback: Fallback::Zero,
    },
    Backfill {
        field: "completedTaskCount",
        source: "completed_task_count",
        fallback: Fallback::Zero,
    },
    Backfill {
        field: "managerName",
        source: "manager_name",
        fallback: Fallback::Text("Unknown"),
    },
];

const SAMPLE_FIELDS: &[Backfill] = &[
    Backfill {
        field: "projectName",
        source: "project_name",
        fallback: Fallback::Text("Unknown Project"),
    },
    Backfill {
        field: "projectCode",
        source: "project_code",
        fallback: Fallback::Text("N/A"),
    },
    Backfill {
        field: "qrCodeUrl",
        source: "qr_code_url",
        fallback: Fallback::Omit,
    },
];

const TASK_FIELDS: &[Backfill] = &[
    Backfill {
        field: "projectName",
        source: "project_name",
        fallback: Fallback::Text("Unknown Project"),
    },
    Backfill {
        field: "sampleCode",
        source: "sample_code",
        fallback: Fallback::Omit,
    },
    Backfill {
        field: "assigneeName",
        source: "assignee_name",
        fallback: Fallback::Omit,
    },
];

fn adapt_detail(upstream: &Value, fields: &[Backfill]) -> Value {
    let mut out: Map<String, Value> = match normalize_keys(upstream) {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for spec in fields {
        let resolved = out
            .get(spec.field)
            .filter(|v| is_present(v))
            .or_else(|| present(upstream, spec.source))
            .cloned();
        apply(&mut out, spec.field, resolved, spec.fallback);
    }

    Value::Object(out)
}

fn apply(out: &mut Map<String, Value>, field: &str, resolved: Option<Value>, fallback: Fallback) {
    match (resolved, fallback) {
        (Some(v), _) => {
            out.insert(field.to_string(), v);
        }
        (None, Fallback::Zero) => {
            debug!(field, "Upstream field absent, defaulting to 0");
            out.insert(field.to_string(), Value::from(0));
        }
        (None, Fallback::Text(text)) => {
            debug!(field, default = text, "Upstream field absent, using placeholder");
            out.insert(field.to_string(), Value::from(text));
        }
        (None, Fallback::Omit) => {
            out.remove(field);
        }
    }
}

/// Adapt a project record, backfilling counts and the manager name.
pub fn adapt_project_detail(upstream: &Value) -> Value {
    adapt_detail(upstream, PROJECT_FIELDS)
}

/// Adapt a sample record, backfilling project display fields and `serialNumber`.
pub fn adapt_sample_detail(upstream: &Value) -> Value {
    let mut out = adapt_detail(upstream, SAMPLE_FIELDS);
    if let Value::Object(map) = &mut out {
        let serial = map
            .get("code")
            .filter(|v| is_present(v))
            .or_else(|| present(upstream, "code"))
            .cloned();
        apply(map, "serialNumber", serial, Fallback::Omit);
    }
    out
}

/// Adapt a task record, backfilling project, sample and assignee display fields.
pub fn adapt_task_detail(upstream: &Value) -> Value {
    adapt_detail(upstream, TASK_FIELDS)
}

// =============================================================================
// ERRORS
// =============================================================================

/// An error raised while talking to the upstream record store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamError {
    /// HTTP status of the upstream response, when one was received.
    pub status: Option<u16>,
    /// `detail` field of the upstream error body.
    pub detail: Option<String>,
    /// Transport-level message.
    pub message: Option<String>,
}

impl UpstreamError {
    /// Build from a received status and error body.
    pub fn from_body(status: u16, body: &Value) -> Self {
        Self {
            status: Some(status),
            detail: body
                .get("detail")
                .and_then(Value::as_str)
                .map(str::to_string),
            message: None,
        }
    }
}

impl From<&reqwest::Error> for UpstreamError {
    fn from(e: &reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            detail: None,
            message: Some(e.to_string()),
        }
    }
}

/// Convert an upstream error into the canonical envelope with `data: null`.
pub fn handle_api_error(error: &UpstreamError) -> ResponseEnvelope<Value> {
    error!(
        { logging::SUBSYSTEM } = "adapter",
        status = ?error.status,
        detail = ?error.detail,
        message = ?error.message,
        "Upstream API error"
    );

    let message = error
        .detail
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| error.message.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or(defaults::ENVELOPE_ERROR_MESSAGE);

    ResponseEnvelope::error(
        error.status.unwrap_or(defaults::ENVELOPE_ERROR_CODE),
        message,
    )
}
