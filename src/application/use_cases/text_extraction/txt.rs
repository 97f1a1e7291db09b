use super::{non_empty, TextExtractionUseCase};
use crate::domain::error::Result;

impl TextExtractionUseCase {
    pub(super) fn parse_txt(&self, bytes: &[u8]) -> Result<Option<String>> {
        let text = String::from_utf8_lossy(bytes);
        Ok(non_empty(text.trim_start_matches('\u{feff}')))
    }
}
