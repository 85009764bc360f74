//! Tools offered to the Staj assistants' chat model
//!
//! Every tool takes string arguments and answers with one text blob. The
//! [`ToolRegistry`] is the explicit table of what the model may call.

mod builtin;
mod document_search;
mod duckduckgo;
mod language;
mod registry;
mod web_search;

#[cfg(test)]
mod tests;

pub use builtin::{AnalyzeDataTool, SendEmailTool};
pub use document_search::DocumentSearchTool;
pub use duckduckgo::DuckDuckGoProvider;
pub use language::Language;
pub use registry::ToolRegistry;
pub use web_search::WebSearchTool;

// Re-export core types for convenience
pub use staj_core::{Error, Result, SearchHit, SearchProvider, ToolHandler, ToolSpec};
