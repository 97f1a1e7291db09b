use crate::domain::error::AppError;
use crate::interfaces::http::{add_log, LogEntry};

use std::path::Path;
use std::sync::{Arc, Mutex};

mod docx;
mod pdf;
mod txt;

const PLAIN_TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "csv", "json", "yaml", "yml", "xml", "html", "htm", "log",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
    Unsupported,
}

impl DocumentKind {
    /// Kind by file extension, then by declared content type.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => return DocumentKind::Pdf,
            Some("docx") => return DocumentKind::Docx,
            Some(ext) if PLAIN_TEXT_EXTENSIONS.contains(&ext) => return DocumentKind::PlainText,
            _ => {}
        }

        match content_type.map(|ct| ct.to_ascii_lowercase()) {
            Some(ct) if ct == "application/pdf" => DocumentKind::Pdf,
            Some(ct)
                if ct == "application/vnd.openxmlformats-officedocument.wordprocessingml.document" =>
            {
                DocumentKind::Docx
            }
            Some(ct) if ct.starts_with("text/") || ct == "application/json" => {
                DocumentKind::PlainText
            }
            _ => DocumentKind::Unsupported,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub text: String,
    pub kind: DocumentKind,
    /// True when `text` is the placeholder rather than document content.
    pub placeholder: bool,
}

pub fn placeholder_text(file_name: &str) -> String {
    format!(
        "Uploaded file: {}. Please extract meaningful text from this document so test cases can be generated.",
        file_name
    )
}

/// Pulls plain text out of uploaded documents. Never fails: unreadable or
/// unsupported documents yield [`placeholder_text`].
pub struct TextExtractionUseCase {
    logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl TextExtractionUseCase {
    pub fn new(logs: Arc<Mutex<Vec<LogEntry>>>) -> Self {
        Self { logs }
    }

    pub fn extract(&self, file_name: &str, content_type: Option<&str>, bytes: &[u8]) -> ExtractedText {
        let kind = DocumentKind::detect(file_name, content_type);
        let parsed = match kind {
            DocumentKind::Pdf => self.parse_pdf(bytes),
            DocumentKind::Docx => self.parse_docx(bytes),
            DocumentKind::PlainText => self.parse_txt(bytes),
            DocumentKind::Unsupported => Err(AppError::ValidationError(format!(
                "Unsupported file type: {}",
                file_name
            ))),
        };

        match parsed {
            Ok(Some(text)) => {
                add_log(
                    &self.logs,
                    "INFO",
                    "Extract",
                    &format!("Extracted {} chars from {}", text.len(), file_name),
                );
                ExtractedText {
                    text,
                    kind,
                    placeholder: false,
                }
            }
            Ok(None) => {
                add_log(
                    &self.logs,
                    "WARN",
                    "Extract",
                    &format!("No text found in {}", file_name),
                );
                self.placeholder(file_name, kind)
            }
            Err(e) => {
                add_log(
                    &self.logs,
                    "WARN",
                    "Extract",
                    &format!("Could not extract text from {}: {}", file_name, e),
                );
                self.placeholder(file_name, kind)
            }
        }
    }

    fn placeholder(&self, file_name: &str, kind: DocumentKind) -> ExtractedText {
        ExtractedText {
            text: placeholder_text(file_name),
            kind,
            placeholder: true,
        }
    }
}

/// Trimmed text, or `None` when nothing but whitespace is left.
fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
