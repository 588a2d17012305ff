use std::path::Path;

pub mod combine;
pub mod config;
pub mod contact;
pub mod dates;
pub mod education;
pub mod experience;
pub mod extractor;
pub mod format;
pub mod location;
pub mod name;
pub mod profile;
pub mod response;
pub mod section;
pub mod skills;
pub mod text_processing;
pub mod url;

pub use combine::combine_outputs;
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use extractor::ProfileExtractor;
pub use format::{NameFallback, OutputMapping, format_record};
pub use name::{NameCandidate, NameStrategy};
pub use response::{
    DocumentOutcome, FETCH_FAILED_NOTE, NO_EXTRACTABLE_DATA_NOTE, ParseResponse, SourceKind,
};
pub use section::{HeaderVariant, SectionSegmenter, locate_section};
pub use url::validate_profile_url;
// Re-export domain types from core (canonical definitions live there)
pub use cvsift_core::{
    BackendError, Document, EducationEntry, ExperienceEntry, PageFetcher, ParseVariant,
    ProfileError, ProfileRecord, SectionKind, SkillCategory, TextExtractor,
};

/// Parse CV text with the default configuration.
pub fn parse_document_text(text: &str) -> ProfileRecord {
    ProfileExtractor::new().parse_document_text(text)
}

/// Parse profile-page text with the default configuration.
pub fn parse_profile_text(text: &str) -> ProfileRecord {
    ProfileExtractor::new().parse_profile_text(text)
}

/// Parse a CV file using the given backend for text extraction.
///
/// Pipeline:
/// 1. Extract text from the file via `backend`
/// 2. Reject text carrying the extraction error marker
/// 3. Locate sections and run the field extractors
/// 4. Parse experience and education entries
/// 5. Format the record, synthesising a name from the file stem if empty
pub fn parse_file(
    path: &Path,
    backend: &dyn TextExtractor,
) -> Result<ParseResponse, ProfileError> {
    ProfileExtractor::new().parse_file(path, backend)
}
