//! Folder loader for PDF, HTML and plain-text documents

use scraper::{ElementRef, Html};
use std::fs;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use staj_core::{DocumentFormat, DocumentRecord, Error, Result};

/// Elements whose text never shows up on a rendered page
const INVISIBLE_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// A file that could not be extracted
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub file_name: String,
    pub error: String,
}

/// Outcome of loading one folder
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<DocumentRecord>,
    pub failures: Vec<LoadFailure>,
}

/// Reads every supported file directly under a folder (non-recursive)
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    folder: PathBuf,
}

impl DocumentLoader {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Extract one record per supported file.
    ///
    /// Unsupported extensions are skipped silently. A file that fails to
    /// extract is logged and recorded in [`LoadReport::failures`]; the rest of
    /// the folder is still loaded. Order follows the directory listing.
    pub fn load(&self) -> Result<LoadReport> {
        let entries = fs::read_dir(&self.folder).map_err(|e| {
            Error::DocumentLoader(format!(
                "Cannot read documents folder {}: {}",
                self.folder.display(),
                e
            ))
        })?;

        let mut report = LoadReport::default();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(folder = %self.folder.display(), error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(format) = DocumentFormat::from_file_name(&file_name) else {
                debug!(file = %file_name, "Skipping unsupported file");
                continue;
            };

            let path = entry.path();
            if !path.is_file() {
                debug!(file = %file_name, "Skipping non-regular file");
                continue;
            }

            match extract_text(&path, format) {
                Ok(text) => {
                    debug!(file = %file_name, format = %format, chars = text.chars().count(), "Extracted document");
                    report
                        .documents
                        .push(DocumentRecord::new(text, file_name, format));
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Failed to extract document, skipping");
                    report.failures.push(LoadFailure {
                        file_name,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Extract the raw text of one file in the given format
pub fn extract_text(path: &Path, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Pdf => extract_pdf(path),
        DocumentFormat::Html => Ok(html_to_text(&fs::read_to_string(path)?)),
        DocumentFormat::Txt => Ok(fs::read_to_string(path)?),
    }
}

/// Page texts concatenated in file order; pages without text add nothing.
fn extract_pdf(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;

    // The PDF parser can panic on malformed fonts
    let pages = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    }))
    .map_err(|_| Error::DocumentLoader("PDF parser panicked".to_string()))?
    .map_err(|e| Error::DocumentLoader(format!("PDF extraction failed: {}", e)))?;

    Ok(pages.concat())
}

/// Text content of an HTML document with all tags stripped
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();
    collect_visible_text(document.root_element(), &mut text);
    text
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !INVISIBLE_ELEMENTS.contains(&child_element.value().name()) {
                collect_visible_text(child_element, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &[u8]) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    /// Minimal PDF with one Helvetica text line per page
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];
        for (i, phrase) in pages.iter().enumerate() {
            let stream = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET", phrase);
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >>",
                5 + 2 * i
            ));
            objects.push(format!("<< /Length {} >>\nstream\n{}\nendstream", stream.len(), stream));
        }

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }

        let xref = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        ));
        pdf.into_bytes()
    }

    #[test]
    fn test_plain_text_is_read_verbatim() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.txt", b"hello");

        let report = DocumentLoader::new(dir.path()).load().unwrap();

        assert_eq!(report.documents.len(), 1);
        assert!(report.failures.is_empty());
        let record = &report.documents[0];
        assert_eq!(record.raw_text, "hello");
        assert_eq!(record.source_filename, "a.txt");
        assert_eq!(record.format, DocumentFormat::Txt);
    }

    #[test]
    fn test_html_tags_are_stripped() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "kurallar.html",
            "<html><head><title>Staj</title><style>p{color:red}</style></head><body><h1>Yönerge</h1><p>30 <b>iş</b> günü</p><script>var x = 1;</script></body></html>".as_bytes(),
        );

        let report = DocumentLoader::new(dir.path()).load().unwrap();

        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.documents[0].raw_text, "StajYönerge30 iş günü");
        assert_eq!(report.documents[0].format, DocumentFormat::Html);
    }

    #[test]
    fn test_html_to_text_keeps_entities_decoded() {
        assert_eq!(html_to_text("<p>Tom &amp; Jerry</p>"), "Tom & Jerry");
    }

    #[test]
    fn test_pdf_pages_are_concatenated_in_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "yonerge.pdf", &pdf_with_pages(&["first page", "", "third page"]));

        let report = DocumentLoader::new(dir.path()).load().unwrap();

        assert!(report.failures.is_empty(), "{:?}", report.failures);
        assert_eq!(report.documents.len(), 1);
        let record = &report.documents[0];
        assert_eq!(record.format, DocumentFormat::Pdf);
        assert_eq!(record.source_filename, "yonerge.pdf");

        let first = record.raw_text.find("first page").unwrap();
        let third = record.raw_text.find("third page").unwrap();
        assert!(first < third);
        assert_eq!(record.raw_text.matches("page").count(), 2);
    }

    #[test]
    fn test_unsupported_extension_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "report.docx", b"PK\x03\x04");
        write(&dir, "notes.md", b"# notes");

        let report = DocumentLoader::new(dir.path()).load().unwrap();

        assert!(report.documents.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_skipped_and_recorded() {
        let dir = TempDir::new().unwrap();
        write(&dir, "one.txt", b"first");
        write(&dir, "two.html", b"<p>second</p>");
        write(&dir, "broken.txt", &[0xff, 0xfe, 0xfd]);
        write(&dir, "bad.pdf", b"this is not a pdf");

        let report = DocumentLoader::new(dir.path()).load().unwrap();

        assert_eq!(report.documents.len(), 2);
        assert_eq!(report.failures.len(), 2);

        let mut failed: Vec<&str> = report.failures.iter().map(|f| f.file_name.as_str()).collect();
        failed.sort();
        assert_eq!(failed, vec!["bad.pdf", "broken.txt"]);

        let mut loaded: Vec<&str> = report.documents.iter().map(|d| d.raw_text.as_str()).collect();
        loaded.sort();
        assert_eq!(loaded, vec!["first", "second"]);
    }

    #[test]
    fn test_subdirectories_are_not_descended() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("arsiv.txt")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("inner.txt"), "hidden").unwrap();

        let report = DocumentLoader::new(dir.path()).load().unwrap();

        assert!(report.documents.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = DocumentLoader::new(dir.path().join("missing")).load().unwrap_err();
        assert!(matches!(err, Error::DocumentLoader(_)));
    }
}
