use std::path::Path;

pub mod fetch;
pub mod html;

pub use fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpPageFetcher};
pub use html::html_to_text;
// Re-export the backend traits for convenience
pub use cvsift_core::{BackendError, PageFetcher, TextExtractor};

/// File-based implementation of [`TextExtractor`].
///
/// Dispatches on file extension:
/// - `.txt`, `.text`, `.md` → read as UTF-8
/// - `.html`, `.htm` → visible text of the page, one text run per line
/// - anything else → [`BackendError::Unsupported`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

impl FileTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for FileTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "txt" | "text" | "md" => read_utf8(path),
            "html" | "htm" => read_utf8(path).map(|html| html_to_text(&html)),
            "" => Err(BackendError::Unsupported(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(BackendError::Unsupported(format!(".{}", other))),
        }
    }
}

fn read_utf8(path: &Path) -> Result<String, BackendError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| BackendError::Read(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), chars = text.len(), "read document");
    Ok(text)
}
