//! Document records produced by ingestion

use serde::{Deserialize, Serialize};
use std::path::Path;

/// File formats the loader knows how to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Html,
    Txt,
}

impl DocumentFormat {
    /// Metadata tag stored alongside indexed text
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Html => "html",
            DocumentFormat::Txt => "txt",
        }
    }

    /// Detect the format from a file name suffix. Matching is case-sensitive.
    pub fn from_file_name(name: &str) -> Option<DocumentFormat> {
        if name.ends_with(".pdf") {
            Some(DocumentFormat::Pdf)
        } else if name.ends_with(".html") {
            Some(DocumentFormat::Html)
        } else if name.ends_with(".txt") {
            Some(DocumentFormat::Txt)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<DocumentFormat> {
        path.file_name()
            .map(|name| name.to_string_lossy())
            .and_then(|name| Self::from_file_name(&name))
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw text extracted from one file, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub raw_text: String,
    pub source_filename: String,
    pub format: DocumentFormat,
}

impl DocumentRecord {
    pub fn new(raw_text: String, source_filename: impl Into<String>, format: DocumentFormat) -> Self {
        Self {
            raw_text,
            source_filename: source_filename.into(),
            format,
        }
    }

    /// Metadata attached to the indexed chunk: `{"source": ..., "type": ...}`
    pub fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "source": self.source_filename,
            "type": self.format.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(DocumentFormat::from_file_name("yonerge.pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_file_name("index.html"), Some(DocumentFormat::Html));
        assert_eq!(DocumentFormat::from_file_name("notes.txt"), Some(DocumentFormat::Txt));
        assert_eq!(DocumentFormat::from_file_name("report.docx"), None);
        assert_eq!(DocumentFormat::from_file_name("page.htm"), None);
        assert_eq!(DocumentFormat::from_file_name("LOUD.PDF"), None);
    }

    #[test]
    fn test_format_from_path() {
        let path = Path::new("/data/staj/basvuru.html");
        assert_eq!(DocumentFormat::from_path(path), Some(DocumentFormat::Html));
        assert_eq!(DocumentFormat::from_path(Path::new("/")), None);
    }

    #[test]
    fn test_record_metadata() {
        let record = DocumentRecord::new("hello".to_string(), "a.txt", DocumentFormat::Txt);
        assert_eq!(
            record.metadata(),
            serde_json::json!({"source": "a.txt", "type": "txt"})
        );
    }
}
