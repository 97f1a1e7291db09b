use super::{non_empty, TextExtractionUseCase};
use crate::domain::error::{AppError, Result};

use lopdf::Document;

impl TextExtractionUseCase {
    pub(super) fn parse_pdf(&self, bytes: &[u8]) -> Result<Option<String>> {
        let document = Document::load_mem(bytes)
            .map_err(|e| AppError::ParseError(format!("Failed to load PDF: {}", e)))?;

        let mut pages = Vec::new();
        for page_number in document.get_pages().keys() {
            // Pages without a text layer are skipped.
            if let Ok(page_text) = document.extract_text(&[*page_number]) {
                if let Some(text) = non_empty(&page_text) {
                    pages.push(text);
                }
            }
        }

        Ok(non_empty(&pages.join("\n\n")))
    }
}
