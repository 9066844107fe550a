//! Prompt construction for every assistant operation.
//!
//! Pure and deterministic: content is embedded verbatim, never truncated or
//! sanitized. Body size is bounded by the HTTP layer's request limit.

use serde::Serialize;

use kbassist_core::{ArticleRef, ChatMessage, OperationRequest};

/// System role for every assist-write action except passthrough.
pub const WRITING_SYSTEM_PROMPT: &str = "你是汕头人工智能实验室的技术文档写作助手，专注于网络安全、无线电测试、固件分析等领域。请使用专业、准确、易读的语言。";

const CHAT_SYSTEM_PREAMBLE: &str = "你是汕头人工智能实验室网络测试平台的知识库助手。你的职责是：
1. 回答用户关于网络安全检测、EN 18031 合规标准、无线电测试、固件分析等方面的问题
2. 基于知识库中的文章内容提供准确的信息
3. 如果问题超出知识库范围，诚实说明并提供一般性建议";

const CHAT_SYSTEM_CLOSING: &str =
    "请用专业但易懂的方式回答问题，适当使用列表和代码示例来增强可读性。";

/// What gets sent to the generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptBody {
    /// A single user prompt.
    Text(String),
    /// A full conversation, forwarded as a structured message list.
    Conversation(Vec<ChatMessage>),
}

/// A complete backend request: optional system role plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: Option<String>,
    pub body: PromptBody,
}

impl Prompt {
    fn text(system: Option<&str>, prompt: String) -> Self {
        Self {
            system: system.map(str::to_string),
            body: PromptBody::Text(prompt),
        }
    }

    /// Byte length of the body, for log fields.
    pub fn len(&self) -> usize {
        match &self.body {
            PromptBody::Text(text) => text.len(),
            PromptBody::Conversation(messages) => messages.iter().map(|m| m.content.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The body as a single prompt string, when it is one.
    pub fn as_text(&self) -> Option<&str> {
        match &self.body {
            PromptBody::Text(text) => Some(text),
            PromptBody::Conversation(_) => None,
        }
    }
}

/// Projection serialized into ranking prompts. Field order is fixed.
#[derive(Serialize)]
struct RankingEntry<'a> {
    id: &'a str,
    title: &'a str,
    summary: &'a str,
    tags: &'a [String],
}

fn corpus_json<'a>(articles: impl Iterator<Item = &'a ArticleRef>) -> String {
    let entries: Vec<RankingEntry<'_>> = articles
        .map(|a| RankingEntry {
            id: &a.id,
            title: &a.title,
            summary: &a.summary,
            tags: &a.tags,
        })
        .collect();
    // Serializing borrowed strings and slices cannot fail.
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}

/// Build the system prompt for a chat turn.
///
/// The related-context block is appended only for a non-empty context.
pub fn chat_system_prompt(context: Option<&str>) -> String {
    let context_block = match context.filter(|c| !c.is_empty()) {
        Some(ctx) => format!("\n相关知识库内容:\n{}", ctx),
        None => String::new(),
    };
    format!(
        "{}\n\n{}\n\n{}",
        CHAT_SYSTEM_PREAMBLE, context_block, CHAT_SYSTEM_CLOSING
    )
}

fn recommend_prompt(subject: &ArticleRef, corpus: &[ArticleRef]) -> String {
    let candidates = corpus_json(corpus.iter().filter(|a| a.id != subject.id));
    format!(
        r#"你是一个内容推荐助手。

当前文章:
- 标题: {}
- 摘要: {}
- 标签: {}

知识库中的其他文章:
{}

请推荐5篇最相关的文章，返回它们的ID数组。
考虑因素: 主题相关性、标签重叠、技术领域关联等。
只返回JSON数组，不要其他内容。例如: ["id1", "id2", "id3", "id4", "id5"]"#,
        subject.title,
        subject.summary,
        subject.tags.join(", "),
        candidates
    )
}

fn search_prompt(query: &str, corpus: &[ArticleRef]) -> String {
    format!(
        r#"你是一个搜索排序助手。用户搜索: "{}"

以下是知识库文章列表（JSON格式）:
{}

请根据语义相关性对文章进行排序，返回最相关的文章ID数组（最多10个），格式为JSON数组。
只返回JSON数组，不要其他内容。例如: ["id1", "id2", "id3"]"#,
        query,
        corpus_json(corpus.iter())
    )
}

fn summarize_prompt(title: &str, body: &str) -> String {
    format!(
        r#"请为以下技术文章生成一个简洁的摘要（100-150字）：

标题: {}

内容:
{}

要求:
1. 摘要应概括文章的核心要点
2. 使用专业但易懂的语言
3. 只输出摘要内容，不要其他说明"#,
        title, body
    )
}

fn generate_article_prompt(topic: &str) -> String {
    format!(
        "请基于以下主题生成一篇专业的技术文章：\n\n主题: {}\n\n要求:\n1. 包含引言、主要内容和总结\n2. 使用 Markdown 格式\n3. 适当添加代码示例\n4. 针对汕头人工智能实验室智能玩具安全检测系统的工程师",
        topic
    )
}

/// Map an operation request to its backend prompt.
pub fn build_prompt(request: &OperationRequest) -> Prompt {
    let writing = Some(WRITING_SYSTEM_PROMPT);
    match request {
        OperationRequest::ExpandContent { content } => Prompt::text(
            writing,
            format!("请扩展以下内容，添加更多技术细节和示例：\n\n{}", content),
        ),
        OperationRequest::SimplifyContent { content } => Prompt::text(
            writing,
            format!("请简化以下技术内容，使其更易于理解：\n\n{}", content),
        ),
        OperationRequest::FormatContent { content } => Prompt::text(
            writing,
            format!(
                "请将以下内容格式化为结构清晰的 Markdown 格式，包含适当的标题、列表和代码块：\n\n{}",
                content
            ),
        ),
        OperationRequest::ProofreadContent { content } => Prompt::text(
            writing,
            format!(
                "请检查以下内容的语法、拼写和技术准确性，并提供修改建议：\n\n{}",
                content
            ),
        ),
        OperationRequest::GenerateArticle { topic, content } => {
            let topic = topic
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(content);
            Prompt::text(writing, generate_article_prompt(topic))
        }
        OperationRequest::Passthrough { content } => Prompt::text(None, content.clone()),
        OperationRequest::ChatTurn {
            history,
            retrieved_context,
        } => Prompt {
            system: Some(chat_system_prompt(retrieved_context.as_deref())),
            body: PromptBody::Conversation(history.clone()),
        },
        OperationRequest::RecommendRelated { subject, corpus } => {
            Prompt::text(None, recommend_prompt(subject, corpus))
        }
        OperationRequest::SearchRank { query, corpus } => {
            Prompt::text(None, search_prompt(query, corpus))
        }
        OperationRequest::Summarize { title, body } => {
            Prompt::text(None, summarize_prompt(title, body))
        }
    }
}
