//! Core traits and types for the Staj assistants
//!
//! This crate defines the seams between the assistants and their external
//! collaborators: chat models, embedding models, web search providers and
//! tools. Concrete implementations live in the sibling crates.

pub mod document;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod search;
pub mod tool;

pub use document::{DocumentFormat, DocumentRecord};
pub use embedding::Embedder;
pub use error::{Error, Result};
pub use llm::{
    ChatMessage, ChatModel, ChatRequest, ChatResponse, ContentBlock, GenerationConfig,
    ReplyContent, Role, TokenUsage, ToolCall,
};
pub use search::{SearchHit, SearchProvider};
pub use tool::{ToolHandler, ToolParameter, ToolSpec, string_argument};
