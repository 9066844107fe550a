//! Data model shared by the prompt builder, rankers, and HTTP layer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::defaults;

// =============================================================================
// ARTICLES
// =============================================================================

/// Minimal projection of a knowledge-base article used for ranking.
///
/// Deserializing a full article into this type drops everything else,
/// including the body, so ranking prompts only ever see these four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ArticleRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Tags as a set; duplicates in the upstream list count once.
    pub fn tag_set(&self) -> HashSet<&str> {
        self.tags.iter().map(String::as_str).collect()
    }
}

/// Ordered article ids; every id is a member of the corpus it was ranked from.
pub type RankedIdList = Vec<String>;

// =============================================================================
// CHAT
// =============================================================================

/// A single conversation turn. Roles are passed through to the backend as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Editing action requested from the writing assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    Expand,
    Simplify,
    Format,
    Proofread,
    Generate,
    /// Any action name this service does not recognise.
    #[serde(other)]
    Unknown,
}

/// One AI operation together with exactly the payload its prompt needs.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    ExpandContent {
        content: String,
    },
    SimplifyContent {
        content: String,
    },
    FormatContent {
        content: String,
    },
    ProofreadContent {
        content: String,
    },
    GenerateArticle {
        topic: Option<String>,
        content: String,
    },
    /// Unrecognised action: the content is sent verbatim with no system role.
    Passthrough {
        content: String,
    },
    ChatTurn {
        history: Vec<ChatMessage>,
        retrieved_context: Option<String>,
    },
    RecommendRelated {
        subject: ArticleRef,
        corpus: Vec<ArticleRef>,
    },
    SearchRank {
        query: String,
        corpus: Vec<ArticleRef>,
    },
    Summarize {
        title: String,
        body: String,
    },
}

impl OperationRequest {
    /// Map an assist-write action onto its request variant.
    pub fn assist_write(
        action: Option<WriteAction>,
        content: String,
        topic: Option<String>,
    ) -> Self {
        match action {
            Some(WriteAction::Expand) => Self::ExpandContent { content },
            Some(WriteAction::Simplify) => Self::SimplifyContent { content },
            Some(WriteAction::Format) => Self::FormatContent { content },
            Some(WriteAction::Proofread) => Self::ProofreadContent { content },
            Some(WriteAction::Generate) => Self::GenerateArticle { topic, content },
            Some(WriteAction::Unknown) | None => Self::Passthrough { content },
        }
    }

    /// Operation name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExpandContent { .. } => "expand",
            Self::SimplifyContent { .. } => "simplify",
            Self::FormatContent { .. } => "format",
            Self::ProofreadContent { .. } => "proofread",
            Self::GenerateArticle { .. } => "generate",
            Self::Passthrough { .. } => "passthrough",
            Self::ChatTurn { .. } => "chat",
            Self::RecommendRelated { .. } => "recommend",
            Self::SearchRank { .. } => "search",
            Self::Summarize { .. } => "summarize",
        }
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Result of exactly one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Ok { text: String },
    Failed { reason: String },
}

impl GenerationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Canonical outward shape for data-bearing endpoints.
///
/// `data` is `None` (serialized as `null`) only on error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ResponseEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: defaults::ENVELOPE_OK_CODE,
            message: defaults::ENVELOPE_OK_MESSAGE.to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}
