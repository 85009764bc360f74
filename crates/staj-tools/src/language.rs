//! Language of the tool descriptions advertised to the model

/// Tool outputs stay Turkish in both languages; only the schema text changes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    #[default]
    Turkish,
    English,
}

impl Language {
    /// Pick the text for this language
    pub fn pick(self, turkish: &'static str, english: &'static str) -> &'static str {
        match self {
            Language::Turkish => turkish,
            Language::English => english,
        }
    }
}
