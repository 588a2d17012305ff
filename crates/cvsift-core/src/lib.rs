use thiserror::Error;

pub mod backend;
pub mod config_file;

pub use backend::{PageFetcher, TextExtractor};

/// Prefix a text extractor puts in front of its output when it could not read
/// a document. Text starting with this marker is never parsed.
pub const EXTRACTION_ERROR_MARKER: &str = "Error processing file";

/// Where a document's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    File,
    Url,
}

/// Raw text obtained from a file or a fetched page.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub origin: Origin,
    /// Filename or URL the text was obtained from.
    pub source: Option<String>,
}

impl Document {
    pub fn from_file(text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::File,
            source: Some(filename.into()),
        }
    }

    pub fn from_url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::Url,
            source: Some(url.into()),
        }
    }
}

/// A semantic region of a résumé or profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    About,
    Certifications,
    Languages,
    Accomplishments,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::About,
        SectionKind::Certifications,
        SectionKind::Languages,
        SectionKind::Accomplishments,
    ];

    /// Canonical header, used as a display label.
    pub fn label(self) -> &'static str {
        self.synonyms()[0]
    }

    /// Header synonyms, tried in order when locating the section.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            SectionKind::Experience => &[
                "Experience",
                "Work Experience",
                "Professional Experience",
                "Employment",
                "Employment History",
                "Work History",
                "Career History",
                "Professional Background",
            ],
            SectionKind::Education => &[
                "Education",
                "Qualifications",
                "Academic Background",
                "Academic",
            ],
            SectionKind::Skills => &[
                "Skills",
                "Technical Skills",
                "Core Competencies",
                "Competencies",
                "Technologies",
                "Expertise",
            ],
            SectionKind::About => &["About", "Summary"],
            SectionKind::Certifications => &["Certifications", "Licenses & Certifications"],
            SectionKind::Languages => &["Languages"],
            SectionKind::Accomplishments => &["Accomplishments"],
        }
    }
}

/// Which pipeline produced a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseVariant {
    /// Free-form CV / résumé text.
    #[default]
    Document,
    /// Text scraped or exported from a professional-networking profile.
    Profile,
}

/// One position in a work history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub dates: Option<String>,
    pub location: Option<String>,
    /// Responsibility lines or a free-text description.
    pub description: Vec<String>,
    /// The text block the entry was parsed from.
    pub raw: String,
}

impl ExperienceEntry {
    /// True if none of title, company or dates were found.
    pub fn is_unstructured(&self) -> bool {
        self.title.is_none() && self.company.is_none() && self.dates.is_none()
    }
}

/// One school, degree or qualification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationEntry {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub dates: Option<String>,
    pub raw: String,
}

impl EducationEntry {
    /// An entry that only carries the source text, with no parsed fields.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Default::default()
        }
    }

    /// True when only the raw text is known.
    pub fn is_raw_only(&self) -> bool {
        self.school.is_none() && self.degree.is_none() && self.field.is_none() && self.dates.is_none()
    }
}

/// A named group of skills, as shown on profile pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Everything extracted from one document.
///
/// Empty strings and empty lists mean "not found"; the formatter drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    pub variant: ParseVariant,
    pub name: String,
    pub headline: String,
    pub location: String,
    pub summary: String,
    pub email: Vec<String>,
    pub phone: Vec<String>,
    pub skills: Vec<String>,
    pub skill_categories: Vec<SkillCategory>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub accomplishments: Vec<String>,
    pub connections: String,
    /// Profile URL the record was fetched from.
    pub source_url: Option<String>,
    /// Filename the record was read from.
    pub source_name: Option<String>,
}

/// Errors raised by text extraction and page fetching backends.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("unsupported document type: {0}")]
    Unsupported(String),
    #[error("failed to read document: {0}")]
    Read(String),
    #[error("failed to fetch page: {0}")]
    Fetch(String),
    #[error("page returned HTTP status {0}")]
    Status(u16),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ProfileError {
    /// The text extractor produced an error instead of document text.
    #[error("input unavailable: {0}")]
    InputUnavailable(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("invalid profile URL: {0}")]
    MalformedUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_constructors() {
        let doc = Document::from_file("Jane Doe", "jane.txt");
        assert_eq!(doc.origin, Origin::File);
        assert_eq!(doc.source.as_deref(), Some("jane.txt"));

        let doc = Document::from_url("Jane Doe", "https://www.linkedin.com/in/jane");
        assert_eq!(doc.origin, Origin::Url);
    }

    #[test]
    fn test_synonyms_start_with_canonical_header() {
        assert_eq!(SectionKind::Experience.synonyms()[0], "Experience");
        assert_eq!(SectionKind::Education.synonyms()[0], "Education");
        assert_eq!(SectionKind::Skills.synonyms()[0], "Skills");
        assert_eq!(SectionKind::About.synonyms(), &["About", "Summary"]);
    }

    #[test]
    fn test_unstructured_entry() {
        let mut entry = ExperienceEntry {
            raw: "Volunteer work".into(),
            ..Default::default()
        };
        assert!(entry.is_unstructured());
        entry.dates = Some("2019 - 2020".into());
        assert!(!entry.is_unstructured());
    }

    #[test]
    fn test_profile_error_display() {
        let err = ProfileError::MalformedUrl("https://example.com".into());
        assert_eq!(err.to_string(), "invalid profile URL: https://example.com");

        let err: ProfileError = BackendError::Status(404).into();
        assert_eq!(err.to_string(), "page returned HTTP status 404");
    }
}
