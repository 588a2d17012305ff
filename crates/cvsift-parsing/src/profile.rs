//! Field and entry helpers for public professional-profile pages.
//!
//! Profile text is flatter than a CV: entries are usually laid out as
//! `Company · Title · Jan 2020 - Present · City` or the same fields on
//! consecutive lines. The section-level parsers here take an already
//! located section body.

use once_cell::sync::Lazy;
use regex::Regex;

use cvsift_core::{EducationEntry, ExperienceEntry, SectionKind, SkillCategory};

use crate::text_processing::{dedup_preserving_order, strip_bullet};

static PROFILE_NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Leading run of letters on the first line
        r"^[ \t]*([A-Za-z][A-Za-z \t\-.]*)",
        // A name followed by a line or segment mentioning the profile
        r"(?i)([A-Za-z][A-Za-z \t\-.]*)[ \t]*(?:\n|·)[^\n]*?\b(?:profile|headline|about|summary)",
        r"(?i)\bprofile(?:[ \t]+of[ \t]+|[ \t]*:[ \t]*)([A-Za-z][A-Za-z \t\-.]*)",
        r"(?i)\bname[ \t]*:[ \t]*([A-Za-z][A-Za-z \t\-.]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static HEADLINE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:headline|title|position)[ \t]*:[ \t]*([^\n]{5,100})",
        r"(?im)^([^\n]{5,100})\n[^\n]*?\b(?:location|about|summary)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static PROFILE_LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:location|based[ \t]+in|living[ \t]+in)[: \t]+([A-Za-z, \t]+)").unwrap()
});

static CONNECTIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:,\d+)?)\s+connections\b").unwrap());

static CONNECTIONS_CAPPED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b500\+\s+connections\b").unwrap());

static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

static PROFILE_EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*(?P<company>[A-Za-z0-9][A-Za-z0-9 \t&.,'\-]*?)[ \t]*(?:·|\n)",
        r"[ \t]*(?P<title>[A-Za-z0-9][A-Za-z0-9 \t&.,'\-]*?)[ \t]*(?:·|\n)",
        r"[ \t]*(?P<dates>[A-Za-z]+\.?[ \t]+\d{4}(?:[ \t]*[-–][ \t]*(?:(?i:present|current)|[A-Za-z]+\.?[ \t]+\d{4}))?)",
        r"(?:[ \t]*·[ \t]*(?P<location>[A-Za-z][A-Za-z0-9, \t]*[A-Za-z]))?",
    ))
    .unwrap()
});

static PROFILE_EDUCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*(?P<school>[A-Za-z][^\n·]*?)[ \t]*(?:·|\n)",
        r"[ \t]*(?P<degree>[A-Za-z][^\n·]*?)?[ \t]*(?:·|\n)?",
        r"[ \t]*(?P<dates>\d{4}(?:[ \t]*[-–][ \t]*\d{4})?)?[ \t]*$",
    ))
    .unwrap()
});

static SKILL_CATEGORY_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[ \t]*([A-Za-z][A-Za-z &,\t\-]*?)[ \t]*·[ \t]*\d+[ \t]*(?:skills|endorsements)[ \t]*$")
        .unwrap()
});

static ACCOMPLISHMENT_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 \t.,]+$").unwrap());

/// Extract the profile owner's name.
///
/// Tries the leading letters of the first line, a name followed by a
/// profile/headline/about/summary mention, `Profile of X`, then `Name: X`.
/// Falls back to the whole first line when it is under 50 characters.
pub fn extract_profile_name(text: &str) -> String {
    let text = text.trim_start();
    for (i, re) in PROFILE_NAME_PATTERNS.iter().enumerate() {
        let Some(caps) = re.captures(text) else {
            continue;
        };
        let Some(name) = caps.get(1) else { continue };
        let name = name.as_str().trim();
        if !name.is_empty() {
            tracing::debug!(pattern = i, name, "profile name matched");
            return name.to_string();
        }
    }

    let first_line = text.lines().next().unwrap_or("").trim();
    if !first_line.is_empty() && first_line.chars().count() < 50 {
        tracing::debug!(name = first_line, "profile name from first line");
        return first_line.to_string();
    }
    String::new()
}

fn acceptable_headline(candidate: &str, name: &str) -> bool {
    let len = candidate.chars().count();
    !candidate.starts_with("http")
        && !candidate.ends_with(".com")
        && len > 5
        && len < 100
        && candidate != name
}

/// Extract the one-line professional headline.
///
/// `name` is the already extracted profile name; a candidate equal to it is
/// rejected so the name line is never reported twice.
pub fn extract_headline(text: &str, name: &str) -> String {
    for re in HEADLINE_PATTERNS.iter() {
        let Some(caps) = re.captures(text) else {
            continue;
        };
        let Some(candidate) = caps.get(1) else {
            continue;
        };
        let candidate = candidate.as_str().trim();
        if acceptable_headline(candidate, name) {
            return candidate.to_string();
        }
    }

    text.trim()
        .lines()
        .skip(1)
        .take(4)
        .map(str::trim)
        .find(|line| acceptable_headline(line, name))
        .unwrap_or("")
        .to_string()
}

/// Location from an explicit `Location:`, `Based in` or `Living in` label.
pub fn extract_profile_location(text: &str) -> String {
    PROFILE_LOCATION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .trim()
                .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
                .to_string()
        })
        .unwrap_or_default()
}

/// First paragraph of an About/Summary section body.
pub fn extract_summary(section: &str) -> String {
    PARAGRAPH_BREAK_RE
        .split(section)
        .map(str::trim)
        .find(|p| !p.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Connection count as written (`1,234`), or `500+` for capped counts.
pub fn extract_connections(text: &str) -> String {
    if let Some(count) = CONNECTIONS_RE.captures(text).and_then(|caps| caps.get(1)) {
        return count.as_str().to_string();
    }
    if CONNECTIONS_CAPPED_RE.is_match(text) {
        return "500+".to_string();
    }
    String::new()
}

/// Parse `company · title · dates[ · location]` entries from an experience
/// section. Fields may also sit on consecutive lines.
///
/// The description is whatever follows an entry up to the next blank line
/// or the next entry.
pub fn parse_profile_experience(section: &str) -> Vec<ExperienceEntry> {
    let matches: Vec<regex::Captures<'_>> = PROFILE_EXPERIENCE_RE.captures_iter(section).collect();
    let mut entries = Vec::with_capacity(matches.len());

    for (i, caps) in matches.iter().enumerate() {
        let Some(whole) = caps.get(0) else { continue };
        let field = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let next_start = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(section.len(), |m| m.start());
        let tail = &section[whole.end()..next_start];
        let tail = PARAGRAPH_BREAK_RE
            .find(tail)
            .map_or(tail, |m| &tail[..m.start()]);
        let description = tail
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        entries.push(ExperienceEntry {
            company: field("company"),
            title: field("title"),
            dates: field("dates"),
            location: field("location"),
            description,
            raw: whole.as_str().trim().to_string(),
        });
    }

    tracing::debug!(count = entries.len(), "profile experience entries");
    entries
}

/// Parse `school · degree · years` entries from an education section.
///
/// A degree of the form `X in Y` is split into degree `X` and field `Y`.
pub fn parse_profile_education(section: &str) -> Vec<EducationEntry> {
    PROFILE_EDUCATION_RE
        .captures_iter(section)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str().trim().to_string();
            let school = caps.name("school").map(|m| m.as_str().trim().to_string());
            let dates = caps.name("dates").map(|m| m.as_str().trim().to_string());
            let (degree, field) = match caps.name("degree").map(|m| m.as_str().trim()) {
                Some(degree) => match degree.split_once(" in ") {
                    Some((d, f)) => (Some(d.trim().to_string()), Some(f.trim().to_string())),
                    None => (Some(degree.to_string()), None),
                },
                None => (None, None),
            };
            let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
            Some(EducationEntry {
                school: non_empty(school),
                degree: non_empty(degree),
                field: non_empty(field),
                dates: non_empty(dates),
                raw,
            })
        })
        .collect()
}

fn split_dotted(line: &str) -> impl Iterator<Item = &str> {
    line.split('·')
        .map(strip_bullet)
        .filter(|item| (2..=30).contains(&item.chars().count()))
}

/// Parse a skills section into named categories and a flat skill list.
///
/// Category headers look like `Industry Knowledge · 12 skills`. Every
/// categorised skill is also in the flat list. Without any category header
/// the section's lines form the flat list on their own.
pub fn parse_skill_categories(section: &str) -> (Vec<SkillCategory>, Vec<String>) {
    let mut categories: Vec<SkillCategory> = Vec::new();
    let mut loose = Vec::new();

    for line in section.lines() {
        if let Some(caps) = SKILL_CATEGORY_HEADER_RE.captures(line) {
            let name = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            categories.push(SkillCategory {
                name,
                skills: Vec::new(),
            });
            continue;
        }
        let items = split_dotted(line).map(str::to_string);
        match categories.last_mut() {
            Some(category) => category.skills.extend(items),
            None => loose.extend(items),
        }
    }

    if categories.is_empty() {
        return (categories, dedup_preserving_order(loose));
    }

    let flat = categories
        .iter()
        .flat_map(|c| c.skills.iter().cloned())
        .collect();
    (categories, dedup_preserving_order(flat))
}

fn is_header_line(line: &str, kind: SectionKind) -> bool {
    kind.synonyms().iter().any(|s| s.eq_ignore_ascii_case(line))
}

/// Certification lines; `Name · Issuer` becomes `Name (Issued by Issuer)`.
pub fn parse_certifications(section: &str) -> Vec<String> {
    let certs = section
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty() && !is_header_line(line, SectionKind::Certifications))
        .map(|line| match line.split_once('·') {
            Some((name, issuer)) if !issuer.trim().is_empty() => {
                format!("{} (Issued by {})", name.trim(), issuer.trim())
            }
            Some((name, _)) => name.trim().to_string(),
            None => line.to_string(),
        })
        .filter(|cert| !cert.is_empty())
        .collect();
    dedup_preserving_order(certs)
}

/// Language names, without their proficiency notes.
pub fn parse_languages(section: &str) -> Vec<String> {
    let mut languages = Vec::new();
    for line in section.lines().map(strip_bullet) {
        if line.is_empty() || is_header_line(line, SectionKind::Languages) {
            continue;
        }
        let head = line.split(['·', '(']).next().unwrap_or("");
        if head.to_ascii_lowercase().contains("proficiency") {
            continue;
        }
        languages.extend(
            head.split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty() && l.chars().all(|c| c.is_alphabetic() || c == ' '))
                .map(str::to_string),
        );
    }
    dedup_preserving_order(languages)
}

/// Plain accomplishment lines (letters, digits, `.` and `,`) longer than 3 chars.
pub fn parse_accomplishments(section: &str) -> Vec<String> {
    section
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.chars().count() > 3
                && ACCOMPLISHMENT_LINE_RE.is_match(line)
                && !is_header_line(line, SectionKind::Accomplishments)
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_name_first_line() {
        let text = "\n  Jane Doe\nStaff Engineer at Acme\nLocation: Berlin";
        assert_eq!(extract_profile_name(text), "Jane Doe");
    }

    #[test]
    fn test_profile_name_label() {
        let text = "• 3rd connection\n12 mutual\nName: Ana Lima";
        assert_eq!(extract_profile_name(text), "Ana Lima");
    }

    #[test]
    fn test_profile_name_first_line_fallback() {
        assert_eq!(extract_profile_name("123 Main"), "123 Main");
        assert_eq!(extract_profile_name(""), "");
    }

    #[test]
    fn test_headline_label() {
        let text = "Jane Doe\nHeadline: Building payment systems\n";
        assert_eq!(extract_headline(text, "Jane Doe"), "Building payment systems");
    }

    #[test]
    fn test_headline_before_location_line() {
        let text = "Jane Doe\nStaff Engineer at Acme\nLocation: Berlin";
        assert_eq!(extract_headline(text, "Jane Doe"), "Staff Engineer at Acme");
    }

    #[test]
    fn test_headline_rejects_name_and_urls() {
        let text = "Jane Doe\nhttps://janedoe.dev\njanedoe.com\nData person here";
        assert_eq!(extract_headline(text, "Jane Doe"), "Data person here");
    }

    #[test]
    fn test_profile_location() {
        let text = "Jane Doe\nLocation: Berlin, Germany\n500+ connections";
        assert_eq!(extract_profile_location(text), "Berlin, Germany");
        assert_eq!(extract_profile_location("Based in Lisbon"), "Lisbon");
        assert_eq!(extract_profile_location("Jane Doe"), "");
    }

    #[test]
    fn test_summary_first_paragraph() {
        let section = "\nI build things.\nMostly in Rust.\n\nOutside work I climb.";
        assert_eq!(extract_summary(section), "I build things.\nMostly in Rust.");
    }

    #[test]
    fn test_connections() {
        assert_eq!(extract_connections("1,234 connections"), "1,234");
        assert_eq!(extract_connections("Jane\n500+ connections"), "500+");
        assert_eq!(extract_connections("no network"), "");
    }

    #[test]
    fn test_profile_experience_single_line() {
        let section = "Acme Corp · Senior Engineer · Jan 2020 - Present · Berlin, Germany\nLed the platform team.\n\nGlobex · Developer · Mar 2017 - Dec 2019";
        let entries = parse_profile_experience(section);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].company.as_deref(), Some("Acme Corp"));
        assert_eq!(entries[0].title.as_deref(), Some("Senior Engineer"));
        assert_eq!(entries[0].dates.as_deref(), Some("Jan 2020 - Present"));
        assert_eq!(entries[0].location.as_deref(), Some("Berlin, Germany"));
        assert_eq!(entries[0].description, vec!["Led the platform team."]);
        assert_eq!(entries[1].company.as_deref(), Some("Globex"));
        assert_eq!(entries[1].dates.as_deref(), Some("Mar 2017 - Dec 2019"));
        assert!(entries[1].location.is_none());
        assert!(entries[1].description.is_empty());
    }

    #[test]
    fn test_profile_experience_multi_line() {
        let section = "Initech\nAnalyst\nJun 2015 - May 2017\nTPS reports.";
        let entries = parse_profile_experience(section);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].company.as_deref(), Some("Initech"));
        assert_eq!(entries[0].title.as_deref(), Some("Analyst"));
        assert_eq!(entries[0].dates.as_deref(), Some("Jun 2015 - May 2017"));
        assert_eq!(entries[0].description, vec!["TPS reports."]);
    }

    #[test]
    fn test_profile_education() {
        let section = "University of Edinburgh · MSc in Informatics · 2010 - 2011\n\nState College\n2005 - 2009";
        let entries = parse_profile_education(section);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].school.as_deref(), Some("University of Edinburgh"));
        assert_eq!(entries[0].degree.as_deref(), Some("MSc"));
        assert_eq!(entries[0].field.as_deref(), Some("Informatics"));
        assert_eq!(entries[0].dates.as_deref(), Some("2010 - 2011"));
        assert_eq!(entries[1].school.as_deref(), Some("State College"));
        assert!(entries[1].degree.is_none());
        assert_eq!(entries[1].dates.as_deref(), Some("2005 - 2009"));
    }

    #[test]
    fn test_skill_categories() {
        let section = "Industry Knowledge · 2 skills\nDistributed Systems · Payments\nTools & Technologies · 1 endorsements\nRust\nPayments";
        let (categories, flat) = parse_skill_categories(section);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Industry Knowledge");
        assert_eq!(categories[0].skills, vec!["Distributed Systems", "Payments"]);
        assert_eq!(categories[1].skills, vec!["Rust", "Payments"]);
        assert_eq!(flat, vec!["Distributed Systems", "Payments", "Rust"]);
    }

    #[test]
    fn test_skills_without_categories() {
        let (categories, flat) = parse_skill_categories("Rust\nGo · SQL\nx");
        assert!(categories.is_empty());
        assert_eq!(flat, vec!["Rust", "Go", "SQL"]);
    }

    #[test]
    fn test_certifications() {
        let section = "Licenses & Certifications\nAWS Solutions Architect · Amazon Web Services\nCKA";
        assert_eq!(
            parse_certifications(section),
            vec![
                "AWS Solutions Architect (Issued by Amazon Web Services)",
                "CKA"
            ]
        );
    }

    #[test]
    fn test_languages() {
        let section = "English · Native or bilingual proficiency\nSpanish (Professional working proficiency)\nFrench, German\nLimited working proficiency";
        assert_eq!(
            parse_languages(section),
            vec!["English", "Spanish", "French", "German"]
        );
    }

    #[test]
    fn test_accomplishments() {
        let section = "Accomplishments\nBest paper award, 2019\nTop 1%\nOK\nPatent US 1234";
        assert_eq!(
            parse_accomplishments(section),
            vec!["Best paper award, 2019", "Patent US 1234"]
        );
    }
}
