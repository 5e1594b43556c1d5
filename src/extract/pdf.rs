use tracing::debug;

use super::error::ExtractionError;
use super::{TextExtractor, normalize_text};

/// [`TextExtractor`] backed by `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn id(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if !looks_like_pdf(bytes) {
            return Err(ExtractionError::NotPdf);
        }

        let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ExtractionError::Parse {
                reason: e.to_string(),
            }
        })?;

        let text = normalize_text(&raw);
        debug!(
            input_bytes = bytes.len(),
            text_chars = text.chars().count(),
            "PDF text extracted"
        );
        Ok(text)
    }
}

#[inline]
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}
