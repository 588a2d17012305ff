//! Person-name detection for free-form CV text.
//!
//! Strategies run in a fixed order and the first one that produces a name
//! wins, except for the proper-name scan and the near-email scan, which pool
//! their candidates and pick the best-scoring one.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::text_processing::{capitalize, ceil_char_boundary, floor_char_boundary};

/// Lines that head a document but are never a person's name.
const GENERIC_HEADERS: &[&str] = &[
    "resume",
    "résumé",
    "curriculum vitae",
    "cv",
    "personal details",
    "contact information",
];

/// First-line titles after which the name is expected on the next line.
const DOCUMENT_TITLES: &[&str] = &["resume", "résumé", "curriculum vitae", "cv"];

/// Job titles that look like names to the proper-name patterns.
const TITLE_PHRASES: &[&str] = &["project manager", "senior developer", "lead engineer"];

const NAME_CAPTURE: &str = r"([A-Z][a-zA-Z'\-]+(?:[ \t]+[A-Z][a-zA-Z'\-]+){1,3})";

static LABEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?i:full[ \t]+name|name|candidate|applicant)[ \t]*:[ \t]*",
        r"\b(?i:curriculum[ \t]+vitae|cv|resume|résumé)[ \t]+(?i:of|for|by)[ \t]+",
        r"\b(?i:about[ \t]+me)[ \t]*:?[ \t]*\n[ \t]*",
        r"\b(?i:contact[ \t]+(?:details|information))[ \t]*:?[ \t]*\n?[ \t]*",
    ]
    .iter()
    .map(|label| Regex::new(&format!("{}{}", label, NAME_CAPTURE)).unwrap())
    .collect()
});

static PROPER_NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Jane Doe, Mary-Ann O'Neil
        r"\b[A-Z][a-z]+(?:[\-'][A-Z][a-z]+)?[ \t]+[A-Z][a-z]+(?:[\-'][A-Z][a-z]+)?\b",
        // JANE DOE
        r"\b[A-Z]{2,}[ \t]+[A-Z]{2,}\b",
        // Jane Q. Doe
        r"\b[A-Z][a-z]+[ \t]+[A-Z]\.[ \t]+[A-Z][a-z]+\b",
        // Jane Quinn Doe
        r"\b[A-Z][a-z]+[ \t]+[A-Z][a-z]+[ \t]+[A-Z][a-z]+\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Which strategy produced a name candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    TopLine,
    Label,
    ProperNameScan,
    NearEmail,
    EmailLocalPart,
}

/// A scored name candidate from the proper-name or near-email scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    pub value: String,
    pub source: NameStrategy,
    pub position_score: i32,
    pub context_score: i32,
}

impl NameCandidate {
    pub fn score(&self) -> i32 {
        self.position_score + self.context_score
    }
}

/// Extract the most likely person name from CV text.
///
/// `emails` are the addresses already extracted from the same text; they feed
/// the near-email scan and the local-part fallback. Returns an empty string
/// when nothing plausible is found.
pub fn extract_name(text: &str, emails: &[String]) -> String {
    extract_name_with_config(text, emails, &ParsingConfig::default())
}

/// Config-aware version of [`extract_name`].
pub(crate) fn extract_name_with_config(
    text: &str,
    emails: &[String],
    config: &ParsingConfig,
) -> String {
    let scan_lines = config.name_scan_lines;
    let top_lines: Vec<&str> = text
        .lines()
        .take(scan_lines)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if let Some(name) = name_from_top_line(&top_lines) {
        tracing::debug!(strategy = ?NameStrategy::TopLine, %name, "name found");
        return name;
    }

    let top_text = top_lines.join("\n");
    if let Some(name) = name_from_labels(&top_text).or_else(|| name_from_labels(text)) {
        tracing::debug!(strategy = ?NameStrategy::Label, %name, "name found");
        return name;
    }

    let candidates = scored_candidates(text, &top_lines, emails, scan_lines);
    if let Some(best) = candidates.into_iter().next() {
        tracing::debug!(strategy = ?best.source, name = %best.value, score = best.score(), "name found");
        return best.value;
    }

    if let Some(name) = emails.first().and_then(|e| name_from_email(e)) {
        tracing::debug!(strategy = ?NameStrategy::EmailLocalPart, %name, "name found");
        return name;
    }

    String::new()
}

/// Pooled candidates from the proper-name scan and the near-email scan,
/// best first. Ties keep discovery order.
pub fn name_candidates(text: &str, emails: &[String]) -> Vec<NameCandidate> {
    let config = ParsingConfig::default();
    let top_lines: Vec<&str> = text
        .lines()
        .take(config.name_scan_lines)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    scored_candidates(text, &top_lines, emails, config.name_scan_lines)
}

fn is_generic(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    GENERIC_HEADERS.contains(&lower.as_str())
}

/// 2–4 capitalized words, under 40 characters, not a document title.
fn looks_like_heading_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|w| w.chars().next().is_some_and(char::is_uppercase))
        && line.chars().count() < 40
        && !is_generic(line)
}

fn name_from_top_line(top_lines: &[&str]) -> Option<String> {
    let first = *top_lines.first()?;
    if looks_like_heading_name(first) {
        return Some(first.to_string());
    }

    if DOCUMENT_TITLES.contains(&first.to_lowercase().as_str()) {
        let second = *top_lines.get(1)?;
        if looks_like_heading_name(second) {
            return Some(second.to_string());
        }
    }
    None
}

fn name_from_labels(text: &str) -> Option<String> {
    LABEL_PATTERNS.iter().find_map(|re| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .find(|name| name.split_whitespace().count() >= 2 && !is_generic(name))
    })
}

fn proper_names(line: &str) -> impl Iterator<Item = regex::Match<'_>> + '_ {
    PROPER_NAME_PATTERNS
        .iter()
        .flat_map(move |re| re.find_iter(line))
        .filter(|m| !is_generic(m.as_str()))
}

fn scored_candidates(
    text: &str,
    top_lines: &[&str],
    emails: &[String],
    scan_lines: usize,
) -> Vec<NameCandidate> {
    let mut candidates = Vec::new();

    for (i, line) in top_lines.iter().enumerate() {
        for m in proper_names(line) {
            candidates.push(NameCandidate {
                value: m.as_str().to_string(),
                source: NameStrategy::ProperNameScan,
                position_score: scan_lines as i32 - i as i32,
                context_score: if m.start() == 0 { 10 } else { 5 },
            });
        }
    }

    if candidates.is_empty() {
        for (i, line) in text.lines().enumerate().skip(scan_lines) {
            let line = line.trim();
            let base = (20 - i as i32).max(1);
            for m in proper_names(line) {
                let is_title = TITLE_PHRASES.contains(&m.as_str().to_lowercase().as_str());
                candidates.push(NameCandidate {
                    value: m.as_str().to_string(),
                    source: NameStrategy::ProperNameScan,
                    position_score: if is_title { base - 5 } else { base },
                    context_score: if m.start() == 0 { 3 } else { 1 },
                });
            }
        }
    }

    let local_part = emails
        .first()
        .and_then(|e| e.split('@').next())
        .map(str::to_lowercase)
        .unwrap_or_default();

    for email in emails {
        let Some(window) = email_window(text, email) else {
            continue;
        };
        for m in proper_names(window) {
            let matches_email = !local_part.is_empty()
                && m
                    .as_str()
                    .split_whitespace()
                    .any(|part| local_part.contains(&part.to_lowercase()));
            candidates.push(NameCandidate {
                value: m.as_str().to_string(),
                source: NameStrategy::NearEmail,
                position_score: if matches_email { 15 } else { 5 },
                context_score: 3,
            });
        }
    }

    // Stable: equal scores keep discovery order.
    candidates.sort_by_key(|c| std::cmp::Reverse(c.score()));
    candidates
}

/// Text from about one line above to one line below the first occurrence of `email`.
fn email_window<'a>(text: &'a str, email: &str) -> Option<&'a str> {
    let idx = text.find(email)?;
    let line_start = text[..idx].rfind('\n').map_or(0, |p| p + 1);
    let line_end = text[idx..].find('\n').map_or(text.len(), |p| idx + p);

    let lookback = floor_char_boundary(text, line_start.saturating_sub(20));
    let start = text[..lookback].rfind('\n').map_or(0, |p| p + 1);

    let after = (line_end + 1).min(text.len());
    let limit = ceil_char_boundary(text, (line_end + 100).min(text.len()));
    let end = text[after..limit]
        .find('\n')
        .map_or(text.len(), |p| after + p);

    Some(&text[start..end])
}

/// `john.doe@example.com` → `John Doe`; needs at least two parts.
fn name_from_email(email: &str) -> Option<String> {
    let local = email.split('@').next()?;
    let parts: Vec<&str> = local
        .split(['.', '_'])
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }
    Some(parts.iter().map(|p| capitalize(p)).collect::<Vec<_>>().join(" "))
}
