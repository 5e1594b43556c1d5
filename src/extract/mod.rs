//! Text extraction (PDF bytes → plain text).
//!
//! Extraction itself is an external concern; this module only defines the seam
//! ([`TextExtractor`]), a `pdf-extract` backed implementation, and the rules for when
//! extracted text counts as a failure:
//!
//! - the extractor returned an error;
//! - the text is empty or whitespace-only;
//! - the text contains [`EXTRACTION_ERROR_MARKER`] (extractors that report errors
//!   in-band instead of failing).

mod error;
mod pdf;


pub use error::ExtractionError;
pub use pdf::{PdfTextExtractor, looks_like_pdf};

use std::sync::Arc;

use crate::constants::EXTRACTION_ERROR_MARKER;

/// Turns raw document bytes into text. Implementations are synchronous and may be
/// CPU-heavy; async callers go through [`extract_blocking`].
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;

    /// Stable name of the extraction backend. Part of the fingerprint cache key, so
    /// switching extractors never reuses vectors computed from another's text.
    fn id(&self) -> &'static str;
}

/// Applies the failure rules above to extractor output.
pub fn check_extracted(text: String) -> Result<String, ExtractionError> {
    if text.contains(EXTRACTION_ERROR_MARKER) {
        return Err(ExtractionError::ErrorMarker {
            excerpt: text.chars().take(120).collect(),
        });
    }
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }
    Ok(text)
}

/// Extracts and checks in one step.
pub fn extract_checked<X>(extractor: &X, bytes: &[u8]) -> Result<String, ExtractionError>
where
    X: TextExtractor + ?Sized,
{
    extractor.extract(bytes).and_then(check_extracted)
}

/// Runs [`extract_checked`] on the blocking pool. A panic inside the extractor is
/// reported as [`ExtractionError::TaskFailed`].
pub async fn extract_blocking<X>(
    extractor: Arc<X>,
    bytes: Vec<u8>,
) -> Result<String, ExtractionError>
where
    X: TextExtractor + ?Sized + 'static,
{
    tokio::task::spawn_blocking(move || extract_checked(extractor.as_ref(), &bytes))
        .await
        .map_err(|e| ExtractionError::TaskFailed {
            reason: e.to_string(),
        })?
}

/// Strips NULs and a leading BOM, unifies line endings, trims trailing space.
pub fn normalize_text(text: &str) -> String {
    let normalized = text
        .replace('\u{0000}', "")
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let lines: Vec<&str> = normalized.lines().map(str::trim_end).collect();
    lines.join("\n").trim().to_string()
}

/// Test extractor that treats document bytes as UTF-8 text.
///
/// Invalid UTF-8 is reported as [`ExtractionError::Parse`], which makes "corrupt"
/// corpus documents easy to fabricate.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTextExtractor;

#[cfg(any(test, feature = "mock"))]
impl MockTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(any(test, feature = "mock"))]
impl TextExtractor for MockTextExtractor {
    fn id(&self) -> &'static str {
        "utf8"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        std::str::from_utf8(bytes)
            .map(normalize_text)
            .map_err(|e| ExtractionError::Parse {
                reason: e.to_string(),
            })
    }
}
