//! Gemini integration for the Staj assistants
//!
//! This crate provides the Gemini implementations of the `ChatModel` and
//! `Embedder` traits.

mod client;
mod config;
mod wire;

#[cfg(test)]
mod tests;

pub use client::{GeminiClient, GeminiEmbedder};
pub use config::{DEFAULT_API_URL, DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL, GeminiConfig};

// Re-export core types for convenience
pub use staj_core::{ChatModel, ChatRequest, ChatResponse, Embedder, Error, Result};
