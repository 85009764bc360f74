//! Explicit capability table of the tools offered to the model

use std::sync::Arc;
use tracing::debug;

use staj_core::{Error, Result, SearchProvider, ToolHandler, ToolSpec};
use staj_rag::LocalVectorStore;

use crate::builtin::{AnalyzeDataTool, SendEmailTool};
use crate::document_search::DocumentSearchTool;
use crate::language::Language;
use crate::web_search::WebSearchTool;

struct RegisteredTool {
    spec: ToolSpec,
    handler: Arc<dyn ToolHandler>,
}

/// Maps tool names to their schema and handler, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tools of the internship assistant: document search first, then the
    /// general tools
    pub fn rag_tools(store: Arc<LocalVectorStore>, provider: Arc<dyn SearchProvider>) -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(DocumentSearchTool::new(store)))
            .register(Arc::new(WebSearchTool::new(provider)))
            .register(Arc::new(AnalyzeDataTool::new(Language::Turkish)))
            .register(Arc::new(SendEmailTool::new(Language::Turkish)));
        registry
    }

    /// Tools of the general chatbot, described in English
    pub fn basic_tools(provider: Arc<dyn SearchProvider>) -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(WebSearchTool::new(provider).with_language(Language::English)))
            .register(Arc::new(AnalyzeDataTool::new(Language::English)))
            .register(Arc::new(SendEmailTool::new(Language::English)));
        registry
    }

    /// Add a tool; a tool with the same name is replaced in place
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> &mut Self {
        let spec = handler.spec();
        match self.tools.iter_mut().find(|t| t.spec.name == spec.name) {
            Some(existing) => {
                existing.spec = spec;
                existing.handler = handler;
            }
            None => self.tools.push(RegisteredTool { spec, handler }),
        }
        self
    }

    /// Schemas advertised to the model
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.spec.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a tool call by name
    pub async fn invoke(&self, name: &str, arguments: &serde_json::Value) -> Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.spec.name == name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        debug!(tool = name, "Dispatching tool call");
        tool.handler.call(arguments).await
    }
}
