//! Retrieval for the Staj assistants
//!
//! This crate loads PDF, HTML and text documents from a folder, embeds them
//! and keeps them in a persistent local vector store that the document
//! search tool queries.

mod context;
mod embedder;
mod loader;
mod pipeline;
mod store;


pub use context::{NO_RESULTS, SNIPPET_CHARS, UNKNOWN_SOURCE, build_context, truncate_chars};
pub use embedder::{HashEmbedder, cosine_similarity};
pub use loader::{DocumentLoader, LoadFailure, LoadReport, extract_text, html_to_text};
pub use pipeline::{IngestSummary, ingest_folder};
pub use store::{
    IndexedChunk, LocalVectorStore, PLACEHOLDER_ID, PLACEHOLDER_TEXT, RetrievedChunk, StoreOrigin,
};

// Re-export core types for convenience
pub use staj_core::{DocumentFormat, DocumentRecord, Embedder, Error, Result};
