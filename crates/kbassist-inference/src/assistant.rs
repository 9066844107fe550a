//! Operation handlers: one stateless request/response cycle per operation.
//!
//! Each call builds a prompt, makes exactly one gateway call, and reconciles
//! the outcome. Free-text operations degrade to a localized placeholder;
//! ranking operations degrade to an empty, unsuccessful list on generation
//! failure and to deterministic ranking on unusable output.

use tracing::{debug, warn};

use kbassist_core::logging::{ERROR_MSG, FALLBACK, OPERATION, RESULT_COUNT, UNKNOWN_COUNT};
use kbassist_core::{
    defaults, ArticleRef, ChatMessage, Error, GenerationOutcome, OperationRequest, RankedIdList,
    WriteAction,
};

use crate::gateway::GenerationGateway;
use crate::parse::{parse_identifier_list, parse_plain_text};
use crate::prompts::build_prompt;
use crate::ranking::{rank_by_query_match, rank_by_tag_overlap, reconcile_ids};

/// Result of a free-text operation (assist-write, chat, summarize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReply {
    pub text: String,
    /// True when `text` is the placeholder, not model output.
    pub degraded: bool,
}

/// Result of a ranking operation (recommend, search).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedReply {
    /// False only when the generation call itself failed.
    pub success: bool,
    pub ids: RankedIdList,
    /// True when the ids came from deterministic ranking.
    pub fallback: bool,
}

impl RankedReply {
    fn unavailable() -> Self {
        Self {
            success: false,
            ids: Vec::new(),
            fallback: false,
        }
    }

    fn ranked(ids: RankedIdList, fallback: bool) -> Self {
        Self {
            success: true,
            ids,
            fallback,
        }
    }
}

/// Facade over prompt building, generation, and result reconciliation.
#[derive(Clone)]
pub struct KnowledgeAssistant {
    gateway: GenerationGateway,
}

impl KnowledgeAssistant {
    pub fn new(gateway: GenerationGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &GenerationGateway {
        &self.gateway
    }

    async fn text_operation(&self, request: OperationRequest, placeholder: &str) -> TextReply {
        let op = request.name();
        let prompt = build_prompt(&request);

        match self.gateway.generate(&prompt).await {
            GenerationOutcome::Ok { text } => TextReply {
                text: parse_plain_text(&text),
                degraded: false,
            },
            GenerationOutcome::Failed { reason } => {
                warn!(
                    { OPERATION } = op,
                    { ERROR_MSG } = %reason,
                    "Returning degraded placeholder"
                );
                TextReply {
                    text: placeholder.to_string(),
                    degraded: true,
                }
            }
        }
    }

    /// Drafting and editing assistance.
    pub async fn assist_write(
        &self,
        action: Option<WriteAction>,
        content: String,
        topic: Option<String>,
    ) -> TextReply {
        let request = OperationRequest::assist_write(action, content, topic);
        self.text_operation(request, defaults::AI_UNAVAILABLE_MESSAGE)
            .await
    }

    /// Conversational Q&A grounded in optional retrieved context.
    pub async fn chat(&self, history: Vec<ChatMessage>, context: Option<String>) -> TextReply {
        let request = OperationRequest::ChatTurn {
            history,
            retrieved_context: context,
        };
        self.text_operation(request, defaults::AI_UNAVAILABLE_MESSAGE)
            .await
    }

    /// Article summary.
    pub async fn summarize(&self, title: String, body: String) -> TextReply {
        let request = OperationRequest::Summarize { title, body };
        self.text_operation(request, defaults::SUMMARY_FAILED_MESSAGE)
            .await
    }

    /// Related-article recommendation, at most [`defaults::RECOMMEND_LIMIT`] ids.
    ///
    /// Falls back to tag overlap when the output is unparseable or when no
    /// proposed id survives reconciliation while candidates exist.
    pub async fn recommend(&self, subject: &ArticleRef, corpus: &[ArticleRef]) -> RankedReply {
        let limit = defaults::RECOMMEND_LIMIT;
        let request = OperationRequest::RecommendRelated {
            subject: subject.clone(),
            corpus: corpus.to_vec(),
        };
        let prompt = build_prompt(&request);

        let text = match self.gateway.generate(&prompt).await {
            GenerationOutcome::Ok { text } => text,
            GenerationOutcome::Failed { .. } => return RankedReply::unavailable(),
        };

        let candidates = corpus.iter().filter(|a| a.id != subject.id);
        let has_candidates = corpus.iter().any(|a| a.id != subject.id);

        match parse_identifier_list(&text) {
            Ok(proposed) => {
                let reconciled = reconcile_ids(proposed, candidates, limit);
                if reconciled.unknown > 0 {
                    warn!(
                        { OPERATION } = "recommend",
                        { UNKNOWN_COUNT } = reconciled.unknown,
                        "Dropped ids not present in corpus"
                    );
                }
                if reconciled.ids.is_empty() && has_candidates {
                    warn!(
                        { OPERATION } = "recommend",
                        { FALLBACK } = true,
                        "No usable ids, ranking by tag overlap"
                    );
                    return RankedReply::ranked(rank_by_tag_overlap(subject, corpus, limit), true);
                }
                debug!(
                    { OPERATION } = "recommend",
                    { RESULT_COUNT } = reconciled.ids.len(),
                    "Recommendation reconciled"
                );
                RankedReply::ranked(reconciled.ids, false)
            }
            Err(failure) => {
                let e = Error::from(failure);
                warn!(
                    { OPERATION } = "recommend",
                    { ERROR_MSG } = %e,
                    { FALLBACK } = true,
                    "Ranking by tag overlap"
                );
                RankedReply::ranked(rank_by_tag_overlap(subject, corpus, limit), true)
            }
        }
    }

    /// Semantic search re-ranking, at most [`defaults::SEARCH_LIMIT`] ids.
    ///
    /// An explicit empty array from the backend is honoured. Falls back to
    /// lexical matching when the output is unparseable or every proposed id
    /// was unknown.
    pub async fn search(&self, query: &str, corpus: &[ArticleRef]) -> RankedReply {
        let limit = defaults::SEARCH_LIMIT;
        let request = OperationRequest::SearchRank {
            query: query.to_string(),
            corpus: corpus.to_vec(),
        };
        let prompt = build_prompt(&request);

        let text = match self.gateway.generate(&prompt).await {
            GenerationOutcome::Ok { text } => text,
            GenerationOutcome::Failed { .. } => return RankedReply::unavailable(),
        };

        match parse_identifier_list(&text) {
            Ok(proposed) => {
                let reconciled = reconcile_ids(proposed, corpus, limit);
                if reconciled.unknown > 0 {
                    warn!(
                        { OPERATION } = "search",
                        { UNKNOWN_COUNT } = reconciled.unknown,
                        "Dropped ids not present in corpus"
                    );
                }
                if reconciled.ids.is_empty() && reconciled.unknown > 0 {
                    warn!(
                        { OPERATION } = "search",
                        { FALLBACK } = true,
                        "Only unknown ids, ranking by query match"
                    );
                    return RankedReply::ranked(rank_by_query_match(query, corpus, limit), true);
                }
                debug!(
                    { OPERATION } = "search",
                    { RESULT_COUNT } = reconciled.ids.len(),
                    "Search reconciled"
                );
                RankedReply::ranked(reconciled.ids, false)
            }
            Err(failure) => {
                let e = Error::from(failure);
                warn!(
                    { OPERATION } = "search",
                    { ERROR_MSG } = %e,
                    { FALLBACK } = true,
                    "Ranking by query match"
                );
                RankedReply::ranked(rank_by_query_match(query, corpus, limit), true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;
    use std::sync::Arc;

    fn assistant(backend: &MockGenerationBackend) -> KnowledgeAssistant {
        KnowledgeAssistant::new(GenerationGateway::new(Arc::new(backend.clone())))
    }

    fn subject() -> ArticleRef {
        ArticleRef::new("a", "Wi-Fi 射频测试").with_tags(["wifi", "rf"])
    }

    fn corpus() -> Vec<ArticleRef> {
        vec![
            ArticleRef::new("b", "Wi-Fi").with_tags(["wifi"]),
            ArticleRef::new("c", "固件"),
            ArticleRef::new("d", "射频").with_tags(["rf", "wifi"]),
        ]
    }

    #[tokio::test]
    async fn test_assist_write_success_trims() {
        let backend = MockGenerationBackend::new().with_fixed_response("\n扩展后的内容\n");
        let reply = assistant(&backend)
            .assist_write(Some(WriteAction::Expand), "原文".into(), None)
            .await;
        assert_eq!(reply.text, "扩展后的内容");
        assert!(!reply.degraded);
        assert!(backend.get_calls()[0].input.ends_with("原文"));
    }

    #[tokio::test]
    async fn test_assist_write_unknown_action_passthrough() {
        let backend = MockGenerationBackend::new();
        assistant(&backend)
            .assist_write(Some(WriteAction::Unknown), "raw prompt".into(), None)
            .await;
        let call = &backend.get_calls()[0];
        assert_eq!(call.input, "raw prompt");
        assert!(call.system.is_none());
    }

    #[tokio::test]
    async fn test_assist_write_failure_placeholder() {
        let backend = MockGenerationBackend::new().failing("offline");
        let reply = assistant(&backend)
            .assist_write(Some(WriteAction::Format), "x".into(), None)
            .await;
        assert_eq!(reply.text, "抱歉，AI 服务暂时不可用。请稍后重试。");
        assert!(reply.degraded);
    }

    #[tokio::test]
    async fn test_chat_sends_history() {
        let backend = MockGenerationBackend::new().with_fixed_response("回答");
        let reply = assistant(&backend)
            .chat(
                vec![ChatMessage::user("问题一"), ChatMessage::assistant("答一"), ChatMessage::user("问题二")],
                Some("上下文".into()),
            )
            .await;
        assert_eq!(reply.text, "回答");
        let call = &backend.get_calls()[0];
        assert_eq!(call.operation, "chat");
        assert_eq!(call.turns, 3);
        assert!(call.system.as_deref().unwrap().contains("上下文"));
    }

    #[tokio::test]
    async fn test_summarize_failure() {
        let backend = MockGenerationBackend::new().failing("boom");
        let reply = assistant(&backend).summarize("t".into(), "b".into()).await;
        assert_eq!(reply.text, "摘要生成失败，请稍后重试。");
        assert!(reply.degraded);
    }

    #[tokio::test]
    async fn test_recommend_uses_model_ids_filtered() {
        let backend = MockGenerationBackend::new().with_fixed_response(r#"["d", "ghost", "a", "b"]"#);
        let reply = assistant(&backend).recommend(&subject(), &corpus()).await;
        assert!(reply.success);
        assert!(!reply.fallback);
        assert_eq!(reply.ids, vec!["d", "b"]);
    }

    #[tokio::test]
    async fn test_recommend_truncates_to_five() {
        let corpus: Vec<ArticleRef> = (0..8).map(|i| ArticleRef::new(i.to_string(), "t")).collect();
        let backend = MockGenerationBackend::new()
            .with_fixed_response(r#"["0","1","2","3","4","5","6","7"]"#);
        let reply = assistant(&backend).recommend(&subject(), &corpus).await;
        assert_eq!(reply.ids.len(), 5);
    }

    #[tokio::test]
    async fn test_recommend_unparseable_falls_back() {
        let backend = MockGenerationBackend::new().with_fixed_response("I recommend d and b.");
        let reply = assistant(&backend).recommend(&subject(), &corpus()).await;
        assert!(reply.success);
        assert!(reply.fallback);
        assert_eq!(reply.ids, vec!["d", "b", "c"]);
    }

    #[tokio::test]
    async fn test_recommend_all_hallucinated_falls_back() {
        let backend = MockGenerationBackend::new().with_fixed_response(r#"["x", "y"]"#);
        let reply = assistant(&backend).recommend(&subject(), &corpus()).await;
        assert!(reply.fallback);
        assert_eq!(reply.ids, vec!["d", "b", "c"]);
    }

    #[tokio::test]
    async fn test_recommend_generation_failure() {
        let backend = MockGenerationBackend::new().failing("offline");
        let reply = assistant(&backend).recommend(&subject(), &corpus()).await;
        assert_eq!(reply, RankedReply::unavailable());
        assert_eq!(backend.generate_call_count(), 1);
    }

    #[tokio::test]
    async fn test_recommend_empty_corpus_stays_empty() {
        let backend = MockGenerationBackend::new().with_fixed_response("[]");
        let reply = assistant(&backend).recommend(&subject(), &[]).await;
        assert!(reply.success);
        assert!(reply.ids.is_empty());
        assert!(!reply.fallback);
    }

    #[tokio::test]
    async fn test_search_model_ranking() {
        let backend = MockGenerationBackend::new().with_fixed_response(r#" ["c","b"] "#);
        let reply = assistant(&backend).search("固件", &corpus()).await;
        assert!(reply.success);
        assert_eq!(reply.ids, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_search_empty_array_honoured() {
        let backend = MockGenerationBackend::new().with_fixed_response("[]");
        let reply = assistant(&backend).search("nothing", &corpus()).await;
        assert!(reply.success);
        assert!(reply.ids.is_empty());
        assert!(!reply.fallback);
    }

    #[tokio::test]
    async fn test_search_unparseable_uses_query_match() {
        let backend = MockGenerationBackend::new().with_fixed_response(r#"{"ids":["c"]}"#);
        let reply = assistant(&backend).search("固件", &corpus()).await;
        assert!(reply.fallback);
        assert_eq!(reply.ids, vec!["c"]);
    }

    #[tokio::test]
    async fn test_search_all_unknown_ids_uses_query_match() {
        let backend = MockGenerationBackend::new().with_fixed_response(r#"["ghost1","ghost2"]"#);
        let reply = assistant(&backend).search("固件", &corpus()).await;
        assert_eq!(
            reply,
            RankedReply {
                success: true,
                ids: vec!["c".to_string()],
                fallback: true,
            }
        );
    }

    #[tokio::test]
    async fn test_search_partially_unknown_ids_kept_without_fallback() {
        let backend = MockGenerationBackend::new().with_fixed_response(r#"["ghost","b"]"#);
        let reply = assistant(&backend).search("固件", &corpus()).await;
        assert_eq!(reply.ids, vec!["b"]);
        assert!(!reply.fallback);
    }

    #[tokio::test]
    async fn test_search_generation_failure() {
        let backend = MockGenerationBackend::new().failing("unreachable");
        let reply = assistant(&backend).search("wifi", &corpus()).await;
        assert!(!reply.success);
        assert!(reply.ids.is_empty());
    }
}
