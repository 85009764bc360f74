//! Web search tool

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use staj_core::{Result, SearchProvider, ToolHandler, ToolSpec, string_argument};

use crate::language::Language;

const MAX_RESULTS: usize = 3;

/// `web_search`: snippets of the top provider hits.
///
/// Provider failures are reported to the model as text, never as errors.
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
    language: Language,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            language: Language::default(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

#[async_trait]
impl ToolHandler for WebSearchTool {
    fn spec(&self) -> ToolSpec {
        let lang = self.language;
        ToolSpec::new(
            "web_search",
            lang.pick(
                "Web'de arama yapmak için kullanılır. Güncel bilgiler için kullanışlıdır.",
                "Searches the web using DuckDuckGo and returns the top 3 text results.",
            ),
        )
        .with_parameter("query", lang.pick("Arama sorgusu", "Search query"))
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<String> {
        let query = string_argument(arguments, "query")?;

        match self.provider.search(query, MAX_RESULTS).await {
            Ok(hits) if hits.is_empty() => Ok("Sonuç bulunamadı.".to_string()),
            Ok(hits) => {
                let snippets: Vec<&str> = hits
                    .iter()
                    .take(MAX_RESULTS)
                    .map(|hit| hit.snippet.as_str())
                    .collect();
                Ok(snippets.join("\n\n"))
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Web search failed");
                Ok(format!("Web araması başarısız: {}", e))
            }
        }
    }
}
