//! Knowledge-base AI endpoints.
//!
//! Two failure conventions coexist and callers depend on both:
//! assist-write, chat and summarize answer HTTP 500 with a placeholder in the
//! normal field; recommend and search answer HTTP 200 with `success: false`.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use kbassist_core::{ArticleRef, ChatMessage, WriteAction};
use kbassist_inference::{RankedReply, TextReply};

use crate::AppState;

/// Optional context for assist-write.
#[derive(Debug, Default, Deserialize)]
pub struct AssistWriteContext {
    pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssistWriteRequest {
    pub action: Option<WriteAction>,
    #[serde(default)]
    pub content: String,
    pub context: Option<AssistWriteContext>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentResponse {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub current_article: ArticleRef,
    #[serde(default)]
    pub all_articles: Vec<ArticleRef>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub success: bool,
    pub recommended_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub articles: Vec<ArticleRef>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub ranked_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

fn text_status(reply: &TextReply) -> StatusCode {
    if reply.degraded {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

/// `POST /api/knowledge/assist-write`
pub async fn assist_write(
    State(state): State<AppState>,
    Json(req): Json<AssistWriteRequest>,
) -> impl IntoResponse {
    let topic = req.context.and_then(|c| c.topic);
    let reply = state
        .assistant
        .assist_write(req.action, req.content, topic)
        .await;
    (
        text_status(&reply),
        Json(ContentResponse {
            content: reply.text,
        }),
    )
}

/// `POST /api/knowledge/chat`
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let reply = state.assistant.chat(req.messages, req.context).await;
    (
        text_status(&reply),
        Json(ContentResponse {
            content: reply.text,
        }),
    )
}

/// `POST /api/knowledge/summarize`
pub async fn summarize(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    let reply = state.assistant.summarize(req.title, req.content).await;
    (
        text_status(&reply),
        Json(SummaryResponse {
            summary: reply.text,
        }),
    )
}

/// `POST /api/knowledge/recommend` (always HTTP 200)
pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Json<RecommendResponse> {
    let RankedReply { success, ids, .. } = state
        .assistant
        .recommend(&req.current_article, &req.all_articles)
        .await;
    Json(RecommendResponse {
        success,
        recommended_ids: ids,
    })
}

/// `POST /api/knowledge/search` (always HTTP 200)
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let RankedReply { success, ids, .. } =
        state.assistant.search(&req.query, &req.articles).await;
    Json(SearchResponse {
        success,
        ranked_ids: ids,
    })
}
