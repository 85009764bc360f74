//! Web search provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// One web search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Trait for web search providers (e.g. DuckDuckGo)
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search the web and return at most `max_results` hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    /// Provider name used in logs
    fn name(&self) -> &'static str;
}
