use once_cell::sync::Lazy;
use regex::Regex;

use cvsift_core::config_file::ConfigFile;

use crate::section::{DEFAULT_SECTION_HEADERS, SectionSegmenter};
use crate::skills::{DEFAULT_SKILL_VOCABULARY, SkillMatcher};

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

impl<T: Clone> ListOverride<T> {
    fn push(&mut self, value: T) {
        match self {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }
}

static DEFAULT_CONFIG: Lazy<ParsingConfig> =
    Lazy::new(|| ParsingConfigBuilder::new().build().unwrap());

/// Configuration for the extraction pipeline.
///
/// Header and vocabulary lists are compiled into regexes once, when the
/// config is built. Use [`ParsingConfigBuilder`] to customise them.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── section.rs ──
    /// Registry of known section headers, compiled into a boundary matcher.
    pub(crate) segmenter: SectionSegmenter,

    // ── skills.rs ──
    /// Whole-word matchers for the skill vocabulary.
    pub(crate) skill_matchers: Vec<SkillMatcher>,

    // ── contact.rs ──
    /// Email regex override.
    pub(crate) email_re: Option<Regex>,

    // ── experience.rs ──
    /// Experience blocks shorter than this (trimmed) are discarded (default: 20).
    pub(crate) min_block_chars: usize,
    /// Profile descriptions longer than this are truncated with `...` (default: 100).
    pub(crate) description_max_chars: usize,

    // ── name.rs ──
    /// Number of leading lines treated as the document header (default: 10).
    pub(crate) name_scan_lines: usize,

    // ── location.rs ──
    /// Exclusive length bounds a location candidate must fall within (default: 3, 50).
    pub(crate) location_min_chars: usize,
    pub(crate) location_max_chars: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl ParsingConfig {
    /// The resolved section header registry.
    pub fn section_headers(&self) -> &[String] {
        self.segmenter.headers()
    }

    /// The resolved skill vocabulary.
    pub fn skill_vocabulary(&self) -> Vec<&str> {
        self.skill_matchers.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn min_block_chars(&self) -> usize {
        self.min_block_chars
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns and plain lists that are compiled in
/// [`build()`](Self::build). Fails fast with `regex::Error` if any pattern is
/// invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    section_headers: ListOverride<String>,
    skill_vocabulary: ListOverride<String>,
    email_re: Option<String>,
    min_block_chars: Option<usize>,
    description_max_chars: Option<usize>,
    name_scan_lines: Option<usize>,
    location_min_chars: Option<usize>,
    location_max_chars: Option<usize>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `[parsing]` section of a loaded config file.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();
        let Some(parsing) = &file.parsing else {
            return builder;
        };
        for header in parsing.extra_section_headers.iter().flatten() {
            builder = builder.add_section_header(header.clone());
        }
        for skill in parsing.extra_skills.iter().flatten() {
            builder = builder.add_skill(skill.clone());
        }
        builder.min_block_chars = parsing.min_block_chars;
        builder.name_scan_lines = parsing.name_scan_lines;
        builder
    }

    // ── Section headers ──

    pub fn set_section_headers(mut self, headers: Vec<String>) -> Self {
        self.section_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_section_header(mut self, header: String) -> Self {
        self.section_headers.push(header);
        self
    }

    // ── Skill vocabulary ──

    pub fn set_skill_vocabulary(mut self, skills: Vec<String>) -> Self {
        self.skill_vocabulary = ListOverride::Replace(skills);
        self
    }

    pub fn add_skill(mut self, skill: String) -> Self {
        self.skill_vocabulary.push(skill);
        self
    }

    // ── Patterns ──

    pub fn email_regex(mut self, pattern: &str) -> Self {
        self.email_re = Some(pattern.to_string());
        self
    }

    // ── Scalars ──

    pub fn min_block_chars(mut self, n: usize) -> Self {
        self.min_block_chars = Some(n);
        self
    }

    pub fn description_max_chars(mut self, n: usize) -> Self {
        self.description_max_chars = Some(n);
        self
    }

    pub fn name_scan_lines(mut self, n: usize) -> Self {
        self.name_scan_lines = Some(n);
        self
    }

    pub fn location_bounds(mut self, min: usize, max: usize) -> Self {
        self.location_min_chars = Some(min);
        self.location_max_chars = Some(max);
        self
    }

    /// Compile all patterns and lists and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let defaults = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };

        let headers = self
            .section_headers
            .resolve(&defaults(DEFAULT_SECTION_HEADERS));
        let vocabulary = self
            .skill_vocabulary
            .resolve(&defaults(DEFAULT_SKILL_VOCABULARY));

        let skill_matchers: Result<Vec<_>, _> =
            vocabulary.iter().map(|s| SkillMatcher::new(s)).collect();

        Ok(ParsingConfig {
            segmenter: SectionSegmenter::new(&headers)?,
            skill_matchers: skill_matchers?,
            email_re: self.email_re.map(|p| Regex::new(&p)).transpose()?,
            min_block_chars: self.min_block_chars.unwrap_or(20),
            description_max_chars: self.description_max_chars.unwrap_or(100),
            name_scan_lines: self.name_scan_lines.unwrap_or(10),
            location_min_chars: self.location_min_chars.unwrap_or(3),
            location_max_chars: self.location_max_chars.unwrap_or(50),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvsift_core::config_file::ParsingSection;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.min_block_chars, 20);
        assert_eq!(config.name_scan_lines, 10);
        assert_eq!(config.description_max_chars, 100);
        assert_eq!((config.location_min_chars, config.location_max_chars), (3, 50));
        assert_eq!(config.section_headers().len(), 19);
        assert!(config.skill_vocabulary().contains(&"Kubernetes"));
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .min_block_chars(40)
            .name_scan_lines(5)
            .location_bounds(2, 80)
            .build()
            .unwrap();
        assert_eq!(config.min_block_chars, 40);
        assert_eq!(config.name_scan_lines, 5);
        assert_eq!(config.location_max_chars, 80);
    }

    #[test]
    fn test_builder_custom_regex() {
        let config = ParsingConfigBuilder::new()
            .email_regex(r"[a-z]+@corp\.example")
            .build()
            .unwrap();
        assert!(config.email_re.is_some());
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new().email_regex(r"[invalid").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_header_overrides() {
        let config = ParsingConfigBuilder::new()
            .add_section_header("Publications & Talks".into())
            .build()
            .unwrap();
        assert_eq!(config.section_headers().len(), 20);

        let config = ParsingConfigBuilder::new()
            .set_section_headers(vec!["Experience".into(), "Education".into()])
            .build()
            .unwrap();
        assert_eq!(config.section_headers(), &["Experience", "Education"]);
    }

    #[test]
    fn test_from_config_file() {
        let file = ConfigFile {
            parsing: Some(ParsingSection {
                extra_skills: Some(vec!["Rust".into()]),
                min_block_chars: Some(30),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = ParsingConfigBuilder::from_config_file(&file).build().unwrap();
        assert_eq!(config.min_block_chars, 30);
        assert_eq!(config.skill_vocabulary().last(), Some(&"Rust"));
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
