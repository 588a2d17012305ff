use std::borrow::Cow;

use cvsift_core::SectionKind;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// Headers that mark the start of a new section in résumé and profile text.
pub const DEFAULT_SECTION_HEADERS: &[&str] = &[
    "About",
    "Experience",
    "Education",
    "Skills",
    "Languages",
    "Certifications",
    "Licenses & Certifications",
    "Accomplishments",
    "Interests",
    "Publications",
    "Projects",
    "Honors",
    "Courses",
    "Recommendations",
    "Activity",
    "Volunteer",
    "Volunteering",
    "Contact",
    "Additional Information",
];

/// Header layouts, in the order they are tried for each synonym.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVariant {
    /// `Experience` alone on a line, or followed by a colon.
    Plain,
    /// `• Experience` / `- Experience`
    Bulleted,
    /// `2. Experience`
    Numbered,
    /// `EXPERIENCE`, matched case-sensitively.
    Uppercase,
    /// `Experience: ...` with content on the same line.
    Colon,
}

impl HeaderVariant {
    pub const ALL: [HeaderVariant; 5] = [
        HeaderVariant::Plain,
        HeaderVariant::Bulleted,
        HeaderVariant::Numbered,
        HeaderVariant::Uppercase,
        HeaderVariant::Colon,
    ];

    fn pattern(self, header: &str) -> String {
        match self {
            HeaderVariant::Plain => format!(r"(?i)(?:^|\n)[ \t]*{}\s*(?:\n|:)", regex::escape(header)),
            HeaderVariant::Bulleted => {
                format!(r"(?i)(?:^|\n)[ \t]*[•\-]\s*{}\s*(?:\n|:)", regex::escape(header))
            }
            HeaderVariant::Numbered => {
                format!(r"(?i)(?:^|\n)[ \t]*\d+\.\s*{}\s*(?:\n|:)", regex::escape(header))
            }
            HeaderVariant::Uppercase => format!(
                r"(?:^|\n)[ \t]*{}\s*(?:\n|:)",
                regex::escape(&header.to_uppercase())
            ),
            HeaderVariant::Colon => format!(r"(?i)(?:^|\n)[ \t]*{}:\s*", regex::escape(header)),
        }
    }
}

static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Compiled header layouts for one synonym.
#[derive(Debug, Clone)]
struct SynonymMatcher {
    synonym: String,
    variants: Vec<(HeaderVariant, Regex)>,
    loose: Regex,
}

impl SynonymMatcher {
    fn new(synonym: &str) -> Result<Self, regex::Error> {
        let variants = HeaderVariant::ALL
            .iter()
            .map(|&variant| Regex::new(&variant.pattern(synonym)).map(|re| (variant, re)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        let loose = Regex::new(&format!(r"(?i)(?:^|\s){}(?:\s|:)", regex::escape(synonym)))?;
        Ok(Self {
            synonym: synonym.to_string(),
            variants,
            loose,
        })
    }
}

/// Locates named sections using a registry of known headers.
///
/// A section runs from its header to the next line that starts with a
/// different registered header, or to the end of the text. Header layouts
/// for every [`SectionKind`] synonym are compiled when the segmenter is
/// built; other synonyms are compiled per lookup.
#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    headers: Vec<String>,
    boundary_re: Option<Regex>,
    matchers: Vec<SynonymMatcher>,
}

impl SectionSegmenter {
    pub fn new(headers: &[String]) -> Result<Self, regex::Error> {
        let boundary_re = if headers.is_empty() {
            None
        } else {
            let alternation = headers
                .iter()
                .map(|h| regex::escape(h))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(
                r"(?i)(?:^|\n)\s*(?:[•\-]\s*|\d+\.\s*)?({})\b",
                alternation
            ))?)
        };

        let mut matchers: Vec<SynonymMatcher> = Vec::new();
        for kind in SectionKind::ALL {
            for synonym in kind.synonyms() {
                if !matchers.iter().any(|m| m.synonym == *synonym) {
                    matchers.push(SynonymMatcher::new(synonym)?);
                }
            }
        }

        Ok(Self {
            headers: headers.to_vec(),
            boundary_re,
            matchers,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// True if `line` is exactly one of the registered headers.
    pub fn is_header(&self, line: &str) -> bool {
        let line = line.trim().trim_end_matches(':');
        self.headers.iter().any(|h| h.eq_ignore_ascii_case(line))
    }

    fn matcher(&self, synonym: &str) -> Option<Cow<'_, SynonymMatcher>> {
        if let Some(m) = self.matchers.iter().find(|m| m.synonym == synonym) {
            return Some(Cow::Borrowed(m));
        }
        SynonymMatcher::new(synonym).ok().map(Cow::Owned)
    }

    /// Find the body of the first section whose header matches one of
    /// `synonyms`.
    ///
    /// Synonyms are tried in order; for each, the [`HeaderVariant`]s are tried
    /// in order and the first one that matches wins. If no header layout
    /// matches, the first loose occurrence of a synonym is used, bounded by
    /// the next blank line.
    pub fn locate(&self, text: &str, synonyms: &[&str]) -> Option<String> {
        let matchers: Vec<Cow<'_, SynonymMatcher>> =
            synonyms.iter().filter_map(|s| self.matcher(s)).collect();

        for matcher in &matchers {
            for (variant, re) in &matcher.variants {
                if let Some(m) = re.find(text) {
                    let body = self.bounded_body(text, m.end(), &matcher.synonym);
                    tracing::debug!(
                        synonym = %matcher.synonym,
                        ?variant,
                        len = body.len(),
                        "section located"
                    );
                    return non_empty(body);
                }
            }
        }

        for matcher in &matchers {
            if let Some(body) = loose_section(text, &matcher.loose) {
                tracing::debug!(synonym = %matcher.synonym, len = body.len(), "section located by loose match");
                return Some(body);
            }
        }

        None
    }

    fn bounded_body<'a>(&self, text: &'a str, start: usize, synonym: &str) -> &'a str {
        let rest = &text[start..];
        // A header match that ended on its colon leaves `rest` mid-line.
        let at_line_start = start == 0 || text[..start].ends_with('\n');
        let end = self
            .boundary_re
            .as_ref()
            .and_then(|re| {
                re.captures_iter(rest)
                    .find(|caps| {
                        let Some(whole) = caps.get(0) else {
                            return false;
                        };
                        let starts_line =
                            whole.start() > 0 || at_line_start || whole.as_str().contains('\n');
                        starts_line
                            && caps
                                .get(1)
                                .is_some_and(|h| !h.as_str().eq_ignore_ascii_case(synonym))
                    })
                    .and_then(|caps| caps.get(0).map(|m| m.start()))
            })
            .unwrap_or(rest.len());
        rest[..end].trim()
    }
}

fn loose_section(text: &str, re: &Regex) -> Option<String> {
    let m = re.find(text)?;
    let rest = &text[m.end()..];
    let end = BLANK_LINE_RE.find(rest).map_or(rest.len(), |b| b.start());
    non_empty(rest[..end].trim())
}

fn non_empty(body: &str) -> Option<String> {
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Locate a section using the default header registry.
///
/// Returns the trimmed text between the first matching header and the next
/// known header, or `None` if no synonym matches.
pub fn locate_section(text: &str, synonyms: &[&str]) -> Option<String> {
    locate_section_with_config(text, synonyms, &ParsingConfig::default())
}

/// Config-aware version of [`locate_section`].
pub(crate) fn locate_section_with_config(
    text: &str,
    synonyms: &[&str],
    config: &ParsingConfig,
) -> Option<String> {
    config.segmenter.locate(text, synonyms)
}
