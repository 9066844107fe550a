//! Health endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Liveness plus generation backend reachability.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub backend_reachable: bool,
}

/// Always 200: an unreachable backend degrades operations, it does not take
/// the service down.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let gateway = state.assistant.gateway();
    Json(HealthResponse {
        status: "ok",
        model: gateway.model_name().to_string(),
        backend_reachable: gateway.is_reachable().await,
    })
}
