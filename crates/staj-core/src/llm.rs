//! Chat model trait and conversation types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;
use crate::tool::ToolSpec;

/// Configuration for a single completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// One block of structured reply content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
        }
    }
}

/// Content of an assistant reply: either one string or a list of blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ReplyContent {
    PlainText(String),
    StructuredBlocks(Vec<ContentBlock>),
}

impl ReplyContent {
    /// Text shown to the user.
    ///
    /// Plain text is returned as is. For blocks only the first one counts:
    /// its `text` when present, otherwise the block serialised as JSON.
    pub fn extract_text(&self) -> String {
        match self {
            ReplyContent::PlainText(text) => text.clone(),
            ReplyContent::StructuredBlocks(blocks) => match blocks.first() {
                Some(ContentBlock { text: Some(text), .. }) => text.clone(),
                Some(block) => serde_json::to_string(block)
                    .unwrap_or_else(|_| format!("{:?}", block)),
                None => String::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ReplyContent::PlainText(text) => text.is_empty(),
            ReplyContent::StructuredBlocks(blocks) => blocks.is_empty(),
        }
    }
}

impl Default for ReplyContent {
    fn default() -> Self {
        ReplyContent::PlainText(String::new())
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    /// Opaque provider token that must be sent back with the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message exchanged within one agent invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ChatMessage {
    User {
        content: String,
    },
    Assistant {
        content: ReplyContent,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    ToolResult {
        call_id: String,
        name: String,
        content: String,
    },
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: ReplyContent) -> Self {
        ChatMessage::Assistant {
            content,
            tool_calls: Vec::new(),
        }
    }

    /// Role of a conversational turn; tool results belong to neither side.
    pub fn role(&self) -> Option<Role> {
        match self {
            ChatMessage::User { .. } => Some(Role::User),
            ChatMessage::Assistant { .. } => Some(Role::Assistant),
            ChatMessage::ToolResult { .. } => None,
        }
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Everything a model needs for one completion
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub system_prompt: &'a str,
    pub messages: &'a [ChatMessage],
    pub tools: &'a [ToolSpec],
    pub config: &'a GenerationConfig,
}

/// The model's answer to a [`ChatRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: ReplyContent,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: ReplyContent::PlainText(text.into()),
            tool_calls: Vec::new(),
            finish_reason: Some("STOP".to_string()),
            usage: None,
        }
    }
}

/// Trait for chat-completion models with tool calling (e.g. Gemini)
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion round
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<ChatResponse>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
