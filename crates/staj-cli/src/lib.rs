//! Conversation layer of the Staj assistants
//!
//! The [`ToolCallingAgent`] answers one user turn with a chat model and the
//! tool registry; the [`SessionLoop`] drives it from a line-based input.

mod agent;
mod config;
mod prompts;
mod render;
mod session;
mod ui;


pub use agent::{AgentRun, Assistant, ToolCallingAgent};
pub use config::{AssistantConfig, DEFAULT_DB_DIR, DEFAULT_DOCS_DIR, EmbedderKind};
pub use prompts::{CHATBOT_SYSTEM_PROMPT, RAG_SYSTEM_PROMPT};
pub use render::{RenderMode, render_markdown};
pub use session::{EXIT_KEYWORDS, FAREWELL, SessionLoop, SessionStats, is_exit_keyword};
pub use ui::{display_banner, print_info, print_ready_hint, print_success, print_warning};

// Re-export core types
pub use staj_core::{Error, Result};
