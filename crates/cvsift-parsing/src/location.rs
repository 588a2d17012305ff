use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Address: 12 High Street, Leeds
        r"(?i)\b(?:address|location|based[ \t]+in)[:. \t][ \t]*([A-Za-z0-9 \t,.'\-]+)",
        // City: Leeds
        r"(?i)\b(?:city|town|region|state|province|country)[:. \t][ \t]*([A-Za-z0-9 \t,.'\-]+)",
        // Austin, TX 78701
        r"\b([A-Z][A-Za-z .'\-]*[a-z],[ \t]*[A-Z]{2}\b(?:[ \t]+\d{5}(?:-\d{4})?)?)",
        // living in Porto
        r"(?i)\b(?:living|working|residing)[ \t]+in[ \t]+([A-Za-z0-9 \t,.'\-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Contact details that tend to trail a location on the same line.
static CONTACT_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:phone|email|e-mail|mobile|tel|web|www)\b.*").unwrap());

/// Extract a location using the ordered pattern cascade.
///
/// Returns an empty string if no candidate survives cleanup and the length
/// sanity check.
pub fn extract_location(text: &str) -> String {
    extract_location_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_location`].
pub(crate) fn extract_location_with_config(text: &str, config: &ParsingConfig) -> String {
    for re in LOCATION_PATTERNS.iter() {
        let Some(caps) = re.captures(text) else {
            continue;
        };
        let Some(raw) = caps.get(1) else {
            continue;
        };
        let cleaned = clean_location(raw.as_str());
        let len = cleaned.chars().count();
        if len > config.location_min_chars && len < config.location_max_chars {
            return cleaned;
        }
    }
    String::new()
}

fn clean_location(raw: &str) -> String {
    let without_contact = CONTACT_NOISE_RE.replace(raw, "");
    without_contact
        .trim()
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}
