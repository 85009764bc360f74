//! Startup shared by the `staj` and `chatbot` binaries

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use staj_cli::RenderMode;
use staj_core::GenerationConfig;
use staj_gemini::{GeminiClient, GeminiConfig};

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Chat model from the environment, optionally with another model id
pub fn chat_model(config: &GeminiConfig, model: Option<String>) -> staj_core::Result<GeminiClient> {
    let client = GeminiClient::new(config.clone())?;
    Ok(match model {
        Some(model) => client.with_model(model),
        None => client,
    })
}

/// Per-request settings; the request deadline follows `GEMINI_TIMEOUT_SECS`
pub fn generation_config(config: &GeminiConfig) -> GenerationConfig {
    GenerationConfig {
        timeout: config.timeout(),
        ..Default::default()
    }
}

/// Markdown rendering for a terminal, the reply text unchanged otherwise
pub fn render_mode(raw: bool) -> RenderMode {
    render_mode_for(raw, styled_output())
}

pub fn render_mode_for(raw: bool, terminal: bool) -> RenderMode {
    if raw || !terminal {
        RenderMode::Raw
    } else {
        RenderMode::Markdown
    }
}

/// ANSI styles only when stdout is a terminal
pub fn styled_output() -> bool {
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_for() {
        assert_eq!(render_mode_for(false, true), RenderMode::Markdown);
        assert_eq!(render_mode_for(true, true), RenderMode::Raw);
        assert_eq!(render_mode_for(false, false), RenderMode::Raw);
    }

    #[test]
    fn test_piped_reply_is_unchanged() {
        let reply = "2 *3* 4";
        assert_eq!(render_mode_for(false, false).render(reply, false), reply);
    }
}
