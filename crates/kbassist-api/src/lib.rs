//! kbassist-api - HTTP API for the kbassist knowledge-base assistant.
//!
//! The binary in `main.rs` only initialises logging and configuration;
//! everything routable lives here so integration tests can mount the same
//! router against a mock generation backend.

pub mod config;
pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use kbassist_core::GenerationBackend;
use kbassist_inference::{GenerationGateway, KnowledgeAssistant};

pub use config::ServerConfig;

/// Application state shared across handlers. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub assistant: KnowledgeAssistant,
}

impl AppState {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            assistant: KnowledgeAssistant::new(GenerationGateway::new(backend)),
        }
    }
}

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// CORS policy: an empty whitelist allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600));

    if origins.is_empty() {
        return base.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}

/// Build the full router with middleware.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/knowledge/assist-write",
            post(handlers::knowledge::assist_write),
        )
        .route("/api/knowledge/chat", post(handlers::knowledge::chat))
        .route(
            "/api/knowledge/recommend",
            post(handlers::knowledge::recommend),
        )
        .route("/api/knowledge/search", post(handlers::knowledge::search))
        .route(
            "/api/knowledge/summarize",
            post(handlers::knowledge::summarize),
        )
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(&config.allowed_origins))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}
