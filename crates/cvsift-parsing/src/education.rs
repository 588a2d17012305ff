use once_cell::sync::Lazy;
use regex::Regex;

use cvsift_core::{EducationEntry, SectionKind};

use crate::config::ParsingConfig;
use crate::text_processing::{dedup_preserving_order, strip_bullet};

static EDUCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:Bachelor|Master|PhD|Diploma|Degree|BSc|MSc|MBA|B\.A\.|M\.A\.|Certificate)[^\n]*?\b(?:of|in)\b[^\n]*?\d{4}",
        r"(?i)\bUniversity[ \t]+of[ \t]+[\w \t]+",
        r"(?i)\bCollege[ \t]+of[ \t]+[\w \t]+",
        r"(?i)\b(?:Graduated|Completed|Obtained)[^\n]*?\d{4}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static ITEM_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+|[ \t]*•[ \t]*").unwrap());

/// Extract education items from CV text.
///
/// Items of an explicit education section come first, followed by degree,
/// institution and graduation phrases found anywhere in the text. Duplicates
/// (exact string) are removed. Items carry only their raw text.
pub fn parse_education(text: &str) -> Vec<EducationEntry> {
    parse_education_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`parse_education`].
pub(crate) fn parse_education_with_config(
    text: &str,
    config: &ParsingConfig,
) -> Vec<EducationEntry> {
    let mut items: Vec<String> = config
        .segmenter
        .locate(text, SectionKind::Education.synonyms())
        .map(|section| {
            ITEM_SPLIT_RE
                .split(&section)
                .map(strip_bullet)
                .filter(|item| item.chars().count() > 5)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    for re in EDUCATION_PATTERNS.iter() {
        items.extend(re.find_iter(text).map(|m| m.as_str().trim().to_string()));
    }

    dedup_preserving_order(items)
        .into_iter()
        .filter(|item| !item.is_empty())
        .map(EducationEntry::from_raw)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[EducationEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.raw.as_str()).collect()
    }

    #[test]
    fn test_section_items_then_patterns() {
        let text = "Education\nBSc in Physics, 2015\nState College\n\nSkills\nRust";
        let entries = parse_education(text);
        assert_eq!(raw(&entries), vec!["BSc in Physics, 2015", "State College"]);
        assert!(entries.iter().all(|e| e.degree.is_none() && e.school.is_none()));
    }

    #[test]
    fn test_patterns_without_section() {
        let text = "I hold a Master of Science from the University of Edinburgh, 2012.\nGraduated with honours in 2012";
        let entries = parse_education(text);
        let items = raw(&entries);
        assert!(items.contains(&"Master of Science from the University of Edinburgh, 2012"));
        assert!(items.contains(&"University of Edinburgh"));
        assert!(items.contains(&"Graduated with honours in 2012"));
    }

    #[test]
    fn test_short_items_dropped() {
        let text = "Education\nMIT\nPhD\n";
        assert!(parse_education(text).is_empty());
    }

    #[test]
    fn test_bulleted_section() {
        let text = "Education\n• Diploma in Design 2010 • Evening classes";
        let items: Vec<String> = parse_education(text).into_iter().map(|e| e.raw).collect();
        assert_eq!(items, vec!["Diploma in Design 2010", "Evening classes"]);
    }
}
