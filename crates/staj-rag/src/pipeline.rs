//! Folder ingestion into the vector store

use tracing::info;

use staj_core::Result;

use crate::loader::DocumentLoader;
use crate::store::LocalVectorStore;

/// Outcome of one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Documents appended to the store
    pub added: usize,
    /// Files skipped because extraction failed
    pub failed: usize,
}

impl IngestSummary {
    /// Turkish status line shown after ingestion
    pub fn message(&self) -> String {
        if self.added == 0 {
            "Eklenecek belge bulunamadı!".to_string()
        } else {
            format!("{} belge başarıyla veritabanına eklendi!", self.added)
        }
    }
}

/// Load every supported file of the loader's folder and append it to the
/// store, one chunk per document.
///
/// Ingestion appends on every call; re-running over the same folder stores
/// the documents again.
pub async fn ingest_folder(loader: &DocumentLoader, store: &LocalVectorStore) -> Result<IngestSummary> {
    let report = loader.load()?;

    let (texts, metadatas): (Vec<String>, Vec<serde_json::Value>) = report
        .documents
        .iter()
        .map(|doc| (doc.raw_text.clone(), doc.metadata()))
        .unzip();

    let added = store.add_texts(&texts, &metadatas).await?;

    info!(
        folder = %loader.folder().display(),
        added,
        failed = report.failures.len(),
        "Ingested documents"
    );

    Ok(IngestSummary {
        added,
        failed: report.failures.len(),
    })
}
