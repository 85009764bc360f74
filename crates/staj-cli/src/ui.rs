//! Terminal output helpers

use colored::*;
use crossterm::terminal::size;

/// Startup banner framed to the terminal width
pub fn display_banner(title: &str, lines: &[&str]) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = terminal_width.saturating_sub(4).clamp(24, 60);
    let inner = banner_width - 2;

    let top_border = format!("┌{}┐", "─".repeat(inner));
    let bottom_border = format!("└{}┘", "─".repeat(inner));
    let empty_line = format!("│{}│", " ".repeat(inner));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());
    println!(
        "{}{}{}{}",
        "│  ".blue(),
        title.blue().bold(),
        " ".repeat(inner.saturating_sub(title.chars().count() + 2)),
        "│".blue()
    );

    if !lines.is_empty() {
        println!("{}", empty_line.blue());
    }
    for line in lines {
        let padding = " ".repeat(inner.saturating_sub(line.chars().count() + 2));
        println!("{}", format!("│  {}{}│", line, padding).blue());
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
}

pub fn print_info(message: &str) {
    println!("{}", message.cyan());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message.yellow());
}

/// Shown once the assistant is ready for questions
pub fn print_ready_hint() {
    println!();
    println!("{}", "Hazır! Sorularınızı yazabilirsiniz.".green().bold());
    println!("{}", "Çıkmak için 'exit' yazın.".dimmed());
    println!();
}
