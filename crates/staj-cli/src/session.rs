//! Interactive read–dispatch–print loop

use std::io::{BufRead, Write};
use tracing::{debug, warn};

use staj_core::{ChatMessage, Result};

use crate::agent::Assistant;
use crate::render::RenderMode;

/// Inputs that end the session, compared case-insensitively after trimming
pub const EXIT_KEYWORDS: [&str; 3] = ["exit", "quit", "çıkış"];

pub const FAREWELL: &str = "👋 Görüşmek üzere!";

pub fn is_exit_keyword(line: &str) -> bool {
    let normalized = line.trim().to_lowercase();
    EXIT_KEYWORDS.contains(&normalized.as_str())
}

/// Counters reported when the session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub dispatched: usize,
    pub failed: usize,
}

enum SessionState {
    AwaitingInput,
    Dispatching(String),
    Printing(Result<String>),
    Terminated,
}

/// Reads one line at a time, forwards it to the assistant and prints the reply
pub struct SessionLoop<A: Assistant> {
    assistant: A,
    prompt: String,
    render_mode: RenderMode,
    styled: bool,
}

impl<A: Assistant> SessionLoop<A> {
    pub fn new(assistant: A) -> Self {
        Self {
            assistant,
            prompt: ">> ".to_string(),
            render_mode: RenderMode::default(),
            styled: false,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    /// Emit ANSI styles in rendered replies
    pub fn with_styles(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn assistant(&self) -> &A {
        &self.assistant
    }

    /// Answer a single question; each call starts a fresh conversation
    pub async fn ask(&self, question: &str) -> Result<String> {
        let run = self
            .assistant
            .invoke(vec![ChatMessage::user(question)])
            .await?;
        debug!(messages = run.messages.len(), tool_calls = run.tool_calls(), "Turn finished");
        Ok(self.render_mode.render(&run.reply_text(), self.styled))
    }

    /// Run until an exit keyword or end of input.
    ///
    /// Blank lines are ignored. A failed turn is printed and the loop goes on.
    pub async fn run<R: BufRead, W: Write>(&self, mut input: R, output: &mut W) -> Result<SessionStats> {
        let mut stats = SessionStats::default();
        let mut state = SessionState::AwaitingInput;

        loop {
            state = match state {
                SessionState::AwaitingInput => {
                    write!(output, "{}", self.prompt)?;
                    output.flush()?;

                    let mut line = String::new();
                    if input.read_line(&mut line)? == 0 {
                        writeln!(output)?;
                        SessionState::Terminated
                    } else if is_exit_keyword(&line) {
                        SessionState::Terminated
                    } else if line.trim().is_empty() {
                        SessionState::AwaitingInput
                    } else {
                        let question = line.trim_end_matches(['\r', '\n']).to_string();
                        SessionState::Dispatching(question)
                    }
                }
                SessionState::Dispatching(question) => {
                    stats.dispatched += 1;
                    SessionState::Printing(self.ask(&question).await)
                }
                SessionState::Printing(Ok(reply)) => {
                    writeln!(output, "\n{}\n", reply)?;
                    SessionState::AwaitingInput
                }
                SessionState::Printing(Err(e)) => {
                    stats.failed += 1;
                    warn!(error = %e, "Turn failed");
                    writeln!(output, "\nHata oluştu: {}\n", e)?;
                    SessionState::AwaitingInput
                }
                SessionState::Terminated => {
                    writeln!(output, "\n{}", FAREWELL)?;
                    return Ok(stats);
                }
            };
        }
    }
}
