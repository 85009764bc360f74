//! Markdown replies rendered as terminal text

use colored::Colorize;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// How replies are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Markdown is converted to terminal text
    #[default]
    Markdown,
    /// The reply is printed exactly as the model wrote it
    Raw,
}

impl RenderMode {
    pub fn render(&self, reply: &str, styled: bool) -> String {
        match self {
            RenderMode::Markdown => render_markdown(reply, styled),
            RenderMode::Raw => reply.to_string(),
        }
    }
}

#[derive(Default)]
struct Renderer {
    out: String,
    styled: bool,
    lists: Vec<Option<u64>>,
    strong: usize,
    emphasis: usize,
    heading: bool,
    code_block: bool,
    link_targets: Vec<String>,
}

impl Renderer {
    fn ensure_line_start(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.code_block {
            for line in text.lines() {
                self.out.push_str("    ");
                self.out.push_str(line);
                self.out.push('\n');
            }
            return;
        }

        if !self.styled {
            self.out.push_str(text);
            return;
        }

        let mut styled = text.normal();
        if self.heading || self.strong > 0 {
            styled = styled.bold();
        }
        if self.heading {
            styled = styled.underline();
        }
        if self.emphasis > 0 {
            styled = styled.italic();
        }
        self.out.push_str(&styled.to_string());
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => {
                self.ensure_line_start();
                self.heading = true;
            }
            Tag::List(start) => {
                self.ensure_line_start();
                self.lists.push(start);
            }
            Tag::Item => {
                self.ensure_line_start();
                let depth = self.lists.len().saturating_sub(1);
                self.out.push_str(&"  ".repeat(depth));
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{}. ", number);
                        *number += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.out.push_str(&marker);
            }
            Tag::CodeBlock(_) => {
                self.ensure_line_start();
                self.code_block = true;
            }
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::Link { dest_url, .. } => self.link_targets.push(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.out.push_str("\n\n"),
            TagEnd::Heading(_) => {
                self.heading = false;
                self.out.push_str("\n\n");
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.ensure_line_start();
                    self.out.push('\n');
                }
            }
            TagEnd::Item => self.ensure_line_start(),
            TagEnd::CodeBlock => {
                self.code_block = false;
                self.out.push('\n');
            }
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Link => {
                if let Some(target) = self.link_targets.pop() {
                    if !self.out.ends_with(&target) {
                        self.out.push_str(&format!(" ({})", target));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Convert Markdown to plain terminal text.
///
/// Emphasis markers disappear (or become ANSI styles when `styled`), list
/// items get bullets or numbers, code blocks are indented.
pub fn render_markdown(markdown: &str, styled: bool) -> String {
    let mut renderer = Renderer {
        styled,
        ..Default::default()
    };

    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        match event {
            Event::Start(tag) => renderer.start(tag),
            Event::End(tag) => renderer.end(tag),
            Event::Text(text) => renderer.push_text(&text),
            Event::Code(code) => {
                if styled {
                    renderer.out.push_str(&code.cyan().to_string());
                } else {
                    renderer.out.push_str(&code);
                }
            }
            Event::SoftBreak | Event::HardBreak => renderer.out.push('\n'),
            Event::Rule => {
                renderer.ensure_line_start();
                renderer.out.push_str(&"─".repeat(40));
                renderer.out.push_str("\n\n");
            }
            Event::Html(html) | Event::InlineHtml(html) => renderer.out.push_str(&html),
            _ => {}
        }
    }

    renderer.out.trim_end().to_string()
}
