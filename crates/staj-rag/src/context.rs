//! Formatting of retrieved chunks into a prompt-ready context block

use crate::store::RetrievedChunk;

/// Label used when a chunk has no `source` metadata
pub const UNKNOWN_SOURCE: &str = "Bilinmiyor";

/// Characters of each chunk shown to the model
pub const SNIPPET_CHARS: usize = 500;

const HEADER: &str = "Staj yönergelerinden ilgili bilgiler:\n\n";
const SEPARATOR: &str = "\n\n---\n\n";

/// Message returned when retrieval found nothing
pub const NO_RESULTS: &str = "İlgili bilgi bulunamadı.";

/// Render hits as `Kaynak: <source>` entries, each followed by the first
/// [`SNIPPET_CHARS`] characters of its text and `...`.
pub fn build_context(chunks: &[RetrievedChunk]) -> String {
    if chunks.is_empty() {
        return NO_RESULTS.to_string();
    }

    let entries: Vec<String> = chunks
        .iter()
        .map(|chunk| {
            format!(
                "Kaynak: {}\n{}...",
                chunk.source().unwrap_or(UNKNOWN_SOURCE),
                truncate_chars(&chunk.text, SNIPPET_CHARS)
            )
        })
        .collect();

    format!("{}{}", HEADER, entries.join(SEPARATOR))
}

/// First `max` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
