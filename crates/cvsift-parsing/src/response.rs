use serde::{Deserialize, Serialize};

use crate::format::OutputMapping;

/// Note attached when nothing but a fallback name could be produced.
pub const NO_EXTRACTABLE_DATA_NOTE: &str =
    "no extractable data found; name derived from the source identifier";

/// Note attached when the profile page could not be fetched.
pub const FETCH_FAILED_NOTE: &str =
    "profile page could not be fetched; only the URL and a name derived from it are available";

/// What kind of input a response was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    CvFile,
    ProfileUrl,
    ProfileFile,
}

/// A formatted parse result plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile_url: Option<String>,
    pub cv_data: OutputMapping,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

impl ParseResponse {
    pub fn new(source: SourceKind, cv_data: OutputMapping) -> Self {
        Self {
            source,
            filename: None,
            profile_url: None,
            cv_data,
            notes: Vec::new(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = Some(url.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Outcome for one document of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentOutcome {
    Parsed(ParseResponse),
    Failed { filename: String, error: String },
}

impl DocumentOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, DocumentOutcome::Parsed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_serialization() {
        let mut data = OutputMapping::new();
        data.insert("name".into(), json!("Jane Doe"));
        let response = ParseResponse::new(SourceKind::CvFile, data).with_filename("jane.pdf");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"source": "cv_file", "filename": "jane.pdf", "cv_data": {"name": "Jane Doe"}})
        );
    }

    #[test]
    fn test_failed_outcome_serialization() {
        let outcome = DocumentOutcome::Failed {
            filename: "broken.pdf".into(),
            error: "failed to read document: bad xref".into(),
        };
        assert!(!outcome.is_parsed());
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({"filename": "broken.pdf", "error": "failed to read document: bad xref"})
        );
    }

    #[test]
    fn test_source_kind_names() {
        assert_eq!(serde_json::to_value(SourceKind::ProfileUrl).unwrap(), json!("profile_url"));
        assert_eq!(serde_json::to_value(SourceKind::ProfileFile).unwrap(), json!("profile_file"));
    }
}
