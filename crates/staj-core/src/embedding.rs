//! Embedding trait

use async_trait::async_trait;

use crate::Result;

/// Trait for text embedding models
///
/// Documents and queries are embedded separately because some providers
/// tune the vector for its role in retrieval.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Stable identifier persisted with an index, e.g. `hash-384`
    fn id(&self) -> String;

    /// Length of every produced vector
    fn dimension(&self) -> usize;

    /// Embed texts that will be stored
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a retrieval query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}
