//! Retrieval tool over the internship documents

use async_trait::async_trait;
use std::sync::Arc;

use staj_core::{Result, ToolHandler, ToolSpec, string_argument};
use staj_rag::{LocalVectorStore, build_context};

/// `document_search`: top hits from the local store formatted as context
pub struct DocumentSearchTool {
    store: Arc<LocalVectorStore>,
    top_k: usize,
}

impl DocumentSearchTool {
    pub const DEFAULT_TOP_K: usize = 3;

    pub fn new(store: Arc<LocalVectorStore>) -> Self {
        Self {
            store,
            top_k: Self::DEFAULT_TOP_K,
        }
    }
}

#[async_trait]
impl ToolHandler for DocumentSearchTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "document_search",
            "Gebze Teknik Üniversitesi staj yönergeleri hakkında bilgi aramak için kullanılır. \
             Staj ile ilgili tüm sorular için bu tool kullanılmalıdır.",
        )
        .with_parameter("query", "Aranacak soru veya anahtar kelimeler")
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<String> {
        let query = string_argument(arguments, "query")?;
        let hits = self.store.retrieve(query, self.top_k).await?;
        Ok(build_context(&hits))
    }
}
