use std::path::Path;

use cvsift_core::{
    Document, EXTRACTION_ERROR_MARKER, PageFetcher, ParseVariant, ProfileError, ProfileRecord,
    SectionKind, TextExtractor,
};

use crate::config::ParsingConfig;
use crate::format::format_with_fallback;
use crate::response::{
    DocumentOutcome, FETCH_FAILED_NOTE, NO_EXTRACTABLE_DATA_NOTE, ParseResponse, SourceKind,
};
use crate::text_processing::normalize_newlines;
use crate::url::{display_name_from_url, validate_profile_url};
use crate::{contact, education, experience, location, name, profile, skills};

/// A configurable résumé and profile extraction pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use
/// [`ProfileExtractor::with_config`] to supply custom headers, vocabulary
/// and thresholds.
pub struct ProfileExtractor {
    config: ParsingConfig,
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Locate one section of `text`, or `None` if it has no such header.
    pub fn locate_section(&self, text: &str, kind: SectionKind) -> Option<String> {
        self.config.segmenter.locate(text, kind.synonyms())
    }

    /// Run the CV extractors over plain text.
    pub fn parse_document_text(&self, text: &str) -> ProfileRecord {
        let text = normalize_newlines(text);
        let config = &self.config;

        let email = contact::extract_emails_with_config(&text, config);
        let name = name::extract_name_with_config(&text, &email, config);
        let record = ProfileRecord {
            variant: ParseVariant::Document,
            name,
            phone: contact::extract_phones(&text),
            location: location::extract_location_with_config(&text, config),
            skills: skills::extract_skills_with_config(&text, config),
            education: education::parse_education_with_config(&text, config),
            experience: experience::parse_experience_with_config(&text, config),
            email,
            ..Default::default()
        };

        tracing::debug!(
            name = %record.name,
            skills = record.skills.len(),
            experience = record.experience.len(),
            education = record.education.len(),
            "parsed document text"
        );
        record
    }

    /// Run the profile extractors over plain text.
    pub fn parse_profile_text(&self, text: &str) -> ProfileRecord {
        let text = normalize_newlines(text);
        let section = |kind: SectionKind| self.locate_section(&text, kind);

        let name = profile::extract_profile_name(&text);
        let headline = profile::extract_headline(&text, &name);
        let (skill_categories, skills) = section(SectionKind::Skills)
            .map(|s| profile::parse_skill_categories(&s))
            .unwrap_or_default();

        let record = ProfileRecord {
            variant: ParseVariant::Profile,
            headline,
            location: profile::extract_profile_location(&text),
            summary: section(SectionKind::About)
                .map(|s| profile::extract_summary(&s))
                .unwrap_or_default(),
            email: contact::extract_emails_with_config(&text, &self.config),
            phone: contact::extract_phones(&text),
            skills,
            skill_categories,
            experience: section(SectionKind::Experience)
                .map(|s| profile::parse_profile_experience(&s))
                .unwrap_or_default(),
            education: section(SectionKind::Education)
                .map(|s| profile::parse_profile_education(&s))
                .unwrap_or_default(),
            certifications: section(SectionKind::Certifications)
                .map(|s| profile::parse_certifications(&s))
                .unwrap_or_default(),
            languages: section(SectionKind::Languages)
                .map(|s| profile::parse_languages(&s))
                .unwrap_or_default(),
            accomplishments: section(SectionKind::Accomplishments)
                .map(|s| profile::parse_accomplishments(&s))
                .unwrap_or_default(),
            connections: profile::extract_connections(&text),
            name,
            ..Default::default()
        };

        tracing::debug!(
            name = %record.name,
            headline = %record.headline,
            experience = record.experience.len(),
            "parsed profile text"
        );
        record
    }

    fn respond(&self, record: &ProfileRecord, source: SourceKind) -> ParseResponse {
        let (cv_data, fallback) = format_with_fallback(record, &self.config);
        let mut response = ParseResponse::new(source, cv_data);
        if let Some(filename) = &record.source_name {
            response = response.with_filename(filename.clone());
        }
        if let Some(url) = &record.source_url {
            response = response.with_profile_url(url.clone());
        }
        if fallback.is_some() {
            response = response.with_note(NO_EXTRACTABLE_DATA_NOTE);
        }
        response
    }

    fn checked_text<'a>(&self, doc: &'a Document) -> Result<&'a str, ProfileError> {
        if doc.text.trim_start().starts_with(EXTRACTION_ERROR_MARKER) {
            tracing::warn!(source = ?doc.source, "text extraction reported an error");
            return Err(ProfileError::InputUnavailable(doc.text.clone()));
        }
        Ok(&doc.text)
    }

    /// Parse an obtained CV document into a response.
    ///
    /// Text that starts with [`EXTRACTION_ERROR_MARKER`] is an upstream
    /// extraction failure and is returned unparsed as
    /// [`ProfileError::InputUnavailable`].
    pub fn parse_document(&self, doc: &Document) -> Result<ParseResponse, ProfileError> {
        let text = self.checked_text(doc)?;
        let mut record = self.parse_document_text(text);
        record.source_name = doc.source.clone();
        Ok(self.respond(&record, SourceKind::CvFile))
    }

    /// Parse an obtained profile document (saved page or export) into a response.
    pub fn parse_profile_document(&self, doc: &Document) -> Result<ParseResponse, ProfileError> {
        let text = self.checked_text(doc)?;
        let mut record = self.parse_profile_text(text);
        record.source_name = doc.source.clone();
        Ok(self.respond(&record, SourceKind::ProfileFile))
    }

    /// Extract a CV file with `backend` and parse it.
    pub fn parse_file(
        &self,
        path: &Path,
        backend: &dyn TextExtractor,
    ) -> Result<ParseResponse, ProfileError> {
        let text = backend.extract_text(path)?;
        let doc = Document::from_file(text, display_filename(path));
        self.parse_document(&doc)
    }

    /// Extract a saved profile file with `backend` and parse it.
    pub fn parse_profile_file(
        &self,
        path: &Path,
        backend: &dyn TextExtractor,
    ) -> Result<ParseResponse, ProfileError> {
        let text = backend.extract_text(path)?;
        let doc = Document::from_file(text, display_filename(path));
        self.parse_profile_document(&doc)
    }

    /// Parse several CV files in order.
    ///
    /// A failure is recorded for its own document and the batch carries on.
    pub fn parse_batch<P: AsRef<Path>>(
        &self,
        paths: &[P],
        backend: &dyn TextExtractor,
    ) -> Vec<DocumentOutcome> {
        let total = paths.len();
        paths
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let path = path.as_ref();
                let filename = display_filename(path);
                tracing::info!(file = %filename, index = i + 1, total, "parsing document");
                match self.parse_file(path, backend) {
                    Ok(response) => DocumentOutcome::Parsed(response),
                    Err(e) => {
                        tracing::warn!(file = %filename, error = %e, "document failed");
                        DocumentOutcome::Failed {
                            filename,
                            error: e.to_string(),
                        }
                    }
                }
            })
            .collect()
    }

    /// Fetch and parse a public profile page.
    ///
    /// An invalid URL is an error. A failed fetch is not: the response then
    /// holds the URL and a name derived from its slug, plus a note.
    pub fn parse_profile_url(
        &self,
        url: &str,
        fetcher: &dyn PageFetcher,
    ) -> Result<ParseResponse, ProfileError> {
        let url = url.trim();
        if !validate_profile_url(url) {
            return Err(ProfileError::MalformedUrl(url.to_string()));
        }

        let text = match fetcher.fetch_page(url) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(url, error = %e, "profile fetch failed, naming from URL");
                let record = ProfileRecord {
                    variant: ParseVariant::Profile,
                    name: display_name_from_url(url),
                    source_url: Some(url.to_string()),
                    ..Default::default()
                };
                return Ok(self
                    .respond(&record, SourceKind::ProfileUrl)
                    .with_note(FETCH_FAILED_NOTE));
            }
        };

        tracing::info!(url, chars = text.len(), "fetched profile page");
        let mut record = self.parse_profile_text(&text);
        record.source_url = Some(url.to_string());
        Ok(self.respond(&record, SourceKind::ProfileUrl))
    }
}

fn display_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
