use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Normalize `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Collapse every run of whitespace (including newlines) into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalize every whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a URL slug or file stem (`jane-doe_cv`) into a display name (`Jane Doe Cv`).
pub fn display_name_from_slug(slug: &str) -> String {
    title_case(&slug.replace(['-', '_', '.'], " "))
}

/// Strip trailing dashes, commas and whitespace left behind by pattern captures.
pub fn strip_trailing_separators(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ',' | '–' | '—'))
        .trim_start()
}

/// Remove duplicates, keeping the first occurrence of each value.
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Truncate to at most `max` characters, ending with `...` when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Largest char boundary at or below `idx`.
pub(crate) fn floor_char_boundary(text: &str, idx: usize) -> usize {
    let mut i = idx.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary at or above `idx`.
pub(crate) fn ceil_char_boundary(text: &str, idx: usize) -> usize {
    let mut i = idx.min(text.len());
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Bullet, dash or numbered-list prefix at the start of a line.
pub(crate) static BULLET_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:[•\-\*▪◦·]|\d+[.)])[ \t]*").unwrap());

/// Drop a leading bullet or list number from a line.
pub fn strip_bullet(line: &str) -> &str {
    match BULLET_PREFIX_RE.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}
