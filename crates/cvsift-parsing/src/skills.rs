use once_cell::sync::Lazy;
use regex::Regex;

use cvsift_core::SectionKind;

use crate::config::ParsingConfig;
use crate::text_processing::{dedup_preserving_order, strip_bullet};

/// Skills recognised anywhere in a document that has no skills section.
pub const DEFAULT_SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "JavaScript",
    "TypeScript",
    "Java",
    "C#",
    "C++",
    "Ruby",
    "PHP",
    "SQL",
    "HTML",
    "CSS",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Git",
    "Agile",
    "Scrum",
    "Machine Learning",
    "AI",
    "Data Science",
    "Excel",
    "Word",
    "PowerPoint",
    "Photoshop",
    "Illustrator",
    ".NET",
    "REST API",
    "GraphQL",
];

/// A vocabulary term and its whole-word, case-insensitive matcher.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    pub name: String,
    re: Regex,
}

impl SkillMatcher {
    /// Build a matcher for `name`.
    ///
    /// Terms that start or end with punctuation (`C++`, `.NET`) cannot use
    /// `\b` on that side, so a non-word character or the text edge is
    /// required instead.
    pub fn new(name: &str) -> Result<Self, regex::Error> {
        let name = name.trim();
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let prefix = if name.chars().next().is_some_and(is_word) {
            r"\b"
        } else {
            r"(?:^|[^\w])"
        };
        let suffix = if name.chars().last().is_some_and(is_word) {
            r"\b"
        } else {
            r"(?:$|[^\w])"
        };
        let re = Regex::new(&format!("(?i){}{}{}", prefix, regex::escape(name), suffix))?;
        Ok(Self {
            name: name.to_string(),
            re,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

static CAPITALIZED_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t•\-\*]*((?:[A-Z][a-z]+|[A-Z]+)(?:[ \t]+[A-Za-z]+){0,2})[ \t]*$").unwrap()
});

/// Extract skills from CV text.
///
/// Sources, unioned in this order: the items of an explicit skills section;
/// vocabulary terms found anywhere (only when there is no skills section);
/// short capitalised lines that are not section headers.
pub fn extract_skills(text: &str) -> Vec<String> {
    extract_skills_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_skills`].
pub(crate) fn extract_skills_with_config(text: &str, config: &ParsingConfig) -> Vec<String> {
    let mut skills = config
        .segmenter
        .locate(text, SectionKind::Skills.synonyms())
        .map(|section| split_skill_list(&section))
        .unwrap_or_default();

    if skills.is_empty() {
        skills.extend(
            config
                .skill_matchers
                .iter()
                .filter(|m| m.is_match(text))
                .map(|m| m.name.clone()),
        );
    }

    for caps in CAPITALIZED_ITEM_RE.captures_iter(text) {
        let Some(item) = caps.get(1) else { continue };
        let item = item.as_str().trim();
        let len = item.chars().count();
        if (2..=25).contains(&len) && !is_section_word(item, config) {
            skills.push(item.to_string());
        }
    }

    dedup_preserving_order(skills)
}

/// Split a skills section on commas, bullets, pipes, semicolons and newlines.
pub fn split_skill_list(section: &str) -> Vec<String> {
    section
        .split([',', '•', '|', ';', '\n'])
        .map(|s| strip_bullet(s).trim_end_matches('.').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_section_word(item: &str, config: &ParsingConfig) -> bool {
    config.segmenter.is_header(item)
        || SectionKind::ALL
            .iter()
            .flat_map(|k| k.synonyms())
            .any(|s| s.eq_ignore_ascii_case(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingConfigBuilder;

    #[test]
    fn test_skills_section_items() {
        let text = "Skills\nPython, Go | Rust; SQL\nEducation\nBSc in Physics 2015";
        let skills = extract_skills(text);
        assert_eq!(&skills[..4], &["Python", "Go", "Rust", "SQL"]);
    }

    #[test]
    fn test_vocabulary_only_without_section() {
        let text = "I write python and c++ daily, deploy with kubernetes.";
        let skills = extract_skills(text);
        assert_eq!(skills, vec!["Python", "C++", "Kubernetes"]);
    }

    #[test]
    fn test_vocabulary_skipped_when_section_present() {
        let text = "Skills\nLeadership\n\nI once used Docker.";
        let skills = extract_skills(text);
        assert!(skills.contains(&"Leadership".to_string()));
        assert!(!skills.contains(&"Docker".to_string()));
    }

    #[test]
    fn test_capitalized_lines_exclude_headers() {
        let text = "Experience\nProject Management\nEducation\n";
        let skills = extract_skills(text);
        assert!(skills.contains(&"Project Management".to_string()));
        assert!(!skills.contains(&"Experience".to_string()));
        assert!(!skills.contains(&"Education".to_string()));
    }

    #[test]
    fn test_skill_matcher_punctuation_terms() {
        let cpp = SkillMatcher::new("C++").unwrap();
        assert!(cpp.is_match("Languages: C++, Rust"));
        assert!(cpp.is_match("C++"));
        let net = SkillMatcher::new(".NET").unwrap();
        assert!(net.is_match("Built on .NET core"));
        assert!(!net.is_match("dotNETwork"));
        let git = SkillMatcher::new("Git").unwrap();
        assert!(!git.is_match("GitHub"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let config = ParsingConfigBuilder::new()
            .set_skill_vocabulary(vec!["Terraform".into()])
            .build()
            .unwrap();
        let skills = extract_skills_with_config("we use terraform and python", &config);
        assert_eq!(skills, vec!["Terraform"]);
    }

    #[test]
    fn test_split_skill_list() {
        assert_eq!(
            split_skill_list("• Rust\n• Go.\n\n- SQL"),
            vec!["Rust", "Go", "SQL"]
        );
    }
}
