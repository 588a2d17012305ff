use std::path::Path;

use crate::BackendError;

/// Trait for document text extraction backends.
///
/// Implementors turn a file (plain text, HTML, OCR output) into raw text; the
/// parsing pipeline lives in `cvsift_parsing::ProfileExtractor`.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text content of a document.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

/// Trait for fetching the visible text of a profile page.
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its text content.
    fn fetch_page(&self, url: &str) -> Result<String, BackendError>;
}
