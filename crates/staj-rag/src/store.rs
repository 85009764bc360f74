//! Persistent local vector store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;
use uuid::Uuid;

use staj_core::{Embedder, Error, Result};

use crate::embedder::cosine_similarity;

/// Text of the record seeded into a freshly created store
pub const PLACEHOLDER_TEXT: &str = "initialization";
/// Fixed id of the seeded record
pub const PLACEHOLDER_ID: &str = "bootstrap-placeholder";

const INDEX_FILE: &str = "index.json";
const INDEX_VERSION: u32 = 1;

/// A stored text with its embedding and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Value,
    pub embedding: Vec<f32>,
    pub indexed_at: DateTime<Utc>,
}

impl IndexedChunk {
    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }
}

/// One hit of [`LocalVectorStore::retrieve`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub metadata: Value,
    pub score: f32,
}

impl RetrievedChunk {
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }
}

/// How the store came to exist at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOrigin {
    /// An existing directory was opened
    Opened,
    /// A new directory was created and seeded with the placeholder
    Created,
}

impl StoreOrigin {
    /// Turkish status line shown at startup
    pub fn message(&self) -> &'static str {
        match self {
            StoreOrigin::Opened => "Mevcut veritabanı yüklendi.",
            StoreOrigin::Created => "Yeni veritabanı oluşturuldu.",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    embedder: String,
    dimension: usize,
    created_at: DateTime<Utc>,
    chunks: Vec<IndexedChunk>,
}

/// Embedding-indexed store persisted as `index.json` inside a directory.
///
/// Not safe for concurrent use by several processes.
pub struct LocalVectorStore {
    persist_dir: PathBuf,
    embedder: Arc<dyn Embedder>,
    index: RwLock<IndexFile>,
    origin: StoreOrigin,
}

impl LocalVectorStore {
    /// Open the store at `persist_dir`, or create it when the directory does not exist.
    ///
    /// A new store is seeded with a single placeholder record so it is never
    /// empty. Opening an index written by a different embedder is an error.
    pub async fn open_or_create(
        persist_dir: impl Into<PathBuf>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let persist_dir = persist_dir.into();

        if persist_dir.exists() {
            Self::open(persist_dir, embedder)
        } else {
            Self::create(persist_dir, embedder).await
        }
    }

    fn open(persist_dir: PathBuf, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if !persist_dir.is_dir() {
            return Err(Error::VectorStore(format!(
                "{} exists but is not a directory",
                persist_dir.display()
            )));
        }

        let index_path = persist_dir.join(INDEX_FILE);
        let index = if index_path.exists() {
            let content = fs::read_to_string(&index_path)?;
            let index: IndexFile = serde_json::from_str(&content).map_err(|e| {
                Error::VectorStore(format!("Corrupt index {}: {}", index_path.display(), e))
            })?;

            if index.embedder != embedder.id() {
                return Err(Error::VectorStore(format!(
                    "Index {} was built with embedder '{}' but '{}' is configured",
                    index_path.display(),
                    index.embedder,
                    embedder.id()
                )));
            }
            index
        } else {
            Self::empty_index(embedder.as_ref())
        };

        info!(
            path = %persist_dir.display(),
            chunks = index.chunks.len(),
            "Opened existing vector store"
        );

        Ok(Self {
            persist_dir,
            embedder,
            index: RwLock::new(index),
            origin: StoreOrigin::Opened,
        })
    }

    async fn create(persist_dir: PathBuf, embedder: Arc<dyn Embedder>) -> Result<Self> {
        fs::create_dir_all(&persist_dir)?;

        let placeholder_embedding = embedder
            .embed_documents(&[PLACEHOLDER_TEXT.to_string()])
            .await?
            .pop()
            .ok_or_else(|| Error::Embedding("No embedding returned for placeholder".to_string()))?;

        let mut index = Self::empty_index(embedder.as_ref());
        index.chunks.push(IndexedChunk {
            id: PLACEHOLDER_ID.to_string(),
            text: PLACEHOLDER_TEXT.to_string(),
            metadata: Value::Object(Default::default()),
            embedding: placeholder_embedding,
            indexed_at: Utc::now(),
        });

        let store = Self {
            persist_dir,
            embedder,
            index: RwLock::new(index),
            origin: StoreOrigin::Created,
        };
        store.persist()?;

        info!(path = %store.persist_dir.display(), "Created new vector store");
        Ok(store)
    }

    fn empty_index(embedder: &dyn Embedder) -> IndexFile {
        IndexFile {
            version: INDEX_VERSION,
            embedder: embedder.id(),
            dimension: embedder.dimension(),
            created_at: Utc::now(),
            chunks: Vec::new(),
        }
    }

    /// Append every `(text, metadata)` pair as a new chunk and persist.
    ///
    /// Every metadata object must carry a non-empty `source`. Returns the
    /// number of chunks added; empty input is a no-op.
    pub async fn add_texts(&self, texts: &[String], metadatas: &[Value]) -> Result<usize> {
        if texts.len() != metadatas.len() {
            return Err(Error::InvalidInput(format!(
                "{} texts but {} metadata entries",
                texts.len(),
                metadatas.len()
            )));
        }

        if texts.is_empty() {
            return Ok(0);
        }

        if let Some(position) = metadatas.iter().position(|m| {
            m.get("source")
                .and_then(Value::as_str)
                .is_none_or(str::is_empty)
        }) {
            return Err(Error::InvalidInput(format!(
                "metadata entry {} has no source",
                position
            )));
        }

        let embeddings = self.embedder.embed_documents(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "{} embeddings returned for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        let now = Utc::now();
        {
            let mut index = self.write_index()?;
            for ((text, metadata), embedding) in texts.iter().zip(metadatas).zip(embeddings) {
                index.chunks.push(IndexedChunk {
                    id: Uuid::new_v4().to_string(),
                    text: text.clone(),
                    metadata: metadata.clone(),
                    embedding,
                    indexed_at: now,
                });
            }
        }

        self.persist()?;
        Ok(texts.len())
    }

    /// The `k` chunks most similar to `query`, best first.
    ///
    /// The placeholder record is never returned, so a store holding nothing
    /// else yields an empty result.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_query(query).await?;
        let index = self.read_index()?;

        let mut results: Vec<RetrievedChunk> = index
            .chunks
            .iter()
            .filter(|chunk| !chunk.is_placeholder())
            .map(|chunk| RetrievedChunk {
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                score: cosine_similarity(&query_embedding, &chunk.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    /// Total number of chunks, placeholder included
    pub fn len(&self) -> usize {
        self.read_index().map(|i| i.chunks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of chunks that came from real documents
    pub fn document_count(&self) -> usize {
        self.read_index()
            .map(|i| i.chunks.iter().filter(|c| !c.is_placeholder()).count())
            .unwrap_or(0)
    }

    pub fn persist_dir(&self) -> &Path {
        &self.persist_dir
    }

    pub fn origin(&self) -> StoreOrigin {
        self.origin
    }

    pub fn index_path(&self) -> PathBuf {
        self.persist_dir.join(INDEX_FILE)
    }

    fn read_index(&self) -> Result<std::sync::RwLockReadGuard<'_, IndexFile>> {
        self.index
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))
    }

    fn write_index(&self) -> Result<std::sync::RwLockWriteGuard<'_, IndexFile>> {
        self.index
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))
    }

    /// Write the index to a temporary file and move it into place
    fn persist(&self) -> Result<()> {
        let content = {
            let index = self.read_index()?;
            serde_json::to_string(&*index)?
        };

        let path = self.index_path();
        let tmp_path = self.persist_dir.join(format!("{}.tmp", INDEX_FILE));
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashEmbedder;
    use serde_json::json;
    use tempfile::TempDir;

    fn embedder() -> Arc<dyn Embedder> {
        Arc::new(HashEmbedder::new())
    }

    #[tokio::test]
    async fn test_create_seeds_placeholder() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("db");

        let store = LocalVectorStore::open_or_create(&db, embedder()).await.unwrap();

        assert_eq!(store.origin(), StoreOrigin::Created);
        assert_eq!(store.origin().message(), "Yeni veritabanı oluşturuldu.");
        assert_eq!(store.len(), 1);
        assert_eq!(store.document_count(), 0);
        assert!(store.index_path().exists());
    }

    #[tokio::test]
    async fn test_reopen_keeps_chunks_and_skips_seeding() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("db");

        {
            let store = LocalVectorStore::open_or_create(&db, embedder()).await.unwrap();
            store
                .add_texts(&["Staj 30 iş günüdür.".to_string()], &[json!({"source": "a.txt", "type": "txt"})])
                .await
                .unwrap();
        }

        let store = LocalVectorStore::open_or_create(&db, embedder()).await.unwrap();
        assert_eq!(store.origin(), StoreOrigin::Opened);
        assert_eq!(store.origin().message(), "Mevcut veritabanı yüklendi.");
        assert_eq!(store.len(), 2);
        assert_eq!(store.document_count(), 1);
    }

    #[tokio::test]
    async fn test_existing_empty_directory_opens_without_placeholder() {
        let dir = TempDir::new().unwrap();

        let store = LocalVectorStore::open_or_create(dir.path(), embedder()).await.unwrap();

        assert_eq!(store.origin(), StoreOrigin::Opened);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_empty_add_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let store = LocalVectorStore::open_or_create(dir.path().join("db"), embedder())
            .await
            .unwrap();

        let added = store.add_texts(&[], &[]).await.unwrap();
        let results = store.retrieve("staj", 3).await.unwrap();

        assert_eq!(added, 0);
        assert_eq!(store.document_count(), 0);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_returns_ingested_source() {
        let dir = TempDir::new().unwrap();
        let store = LocalVectorStore::open_or_create(dir.path().join("db"), embedder())
            .await
            .unwrap();

        store
            .add_texts(&["a".to_string()], &[json!({"source": "a.txt"})])
            .await
            .unwrap();
        let results = store.retrieve("a", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source(), Some("a.txt"));
        assert_eq!(results[0].text, "a");
    }

    #[tokio::test]
    async fn test_retrieve_ranks_by_similarity() {
        let dir = TempDir::new().unwrap();
        let store = LocalVectorStore::open_or_create(dir.path().join("db"), embedder())
            .await
            .unwrap();

        store
            .add_texts(
                &[
                    "Yemekhane menüsü her hafta yayınlanır.".to_string(),
                    "Zorunlu staj süresi 30 iş günüdür ve yaz döneminde yapılır.".to_string(),
                    "Kütüphane hafta sonu kapalıdır.".to_string(),
                    "Staj defteri staj bitiminden sonra teslim edilir.".to_string(),
                ],
                &[
                    json!({"source": "menu.txt"}),
                    json!({"source": "staj.pdf"}),
                    json!({"source": "kutuphane.html"}),
                    json!({"source": "defter.txt"}),
                ],
            )
            .await
            .unwrap();

        let results = store.retrieve("zorunlu staj süresi", 3).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].source(), Some("staj.pdf"));
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[tokio::test]
    async fn test_mismatched_lengths_rejected() {
        let dir = TempDir::new().unwrap();
        let store = LocalVectorStore::open_or_create(dir.path().join("db"), embedder())
            .await
            .unwrap();

        let err = store
            .add_texts(&["x".to_string()], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_metadata_without_source_rejected() {
        let dir = TempDir::new().unwrap();
        let store = LocalVectorStore::open_or_create(dir.path().join("db"), embedder())
            .await
            .unwrap();

        let err = store
            .add_texts(&["x".to_string(), "y".to_string()], &[json!({"source": "x.txt"}), json!({"source": ""})])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid input: metadata entry 1 has no source");
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn test_embedder_mismatch_rejected_on_open() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("db");
        LocalVectorStore::open_or_create(&db, embedder()).await.unwrap();

        let other: Arc<dyn Embedder> = Arc::new(HashEmbedder::with_dimension(64));
        let err = LocalVectorStore::open_or_create(&db, other).await.err().unwrap();

        assert!(matches!(err, Error::VectorStore(_)));
        assert!(err.to_string().contains("hash-384"));
    }

    #[tokio::test]
    async fn test_corrupt_index_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(INDEX_FILE), "{not json").unwrap();

        let err = LocalVectorStore::open_or_create(dir.path(), embedder()).await.err().unwrap();
        assert!(err.to_string().starts_with("Vector store error: Corrupt index"));
    }
}
