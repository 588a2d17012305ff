use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::text_processing::{collapse_whitespace, dedup_preserving_order};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").unwrap());

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // International: +44 20 7946 0958, +1-555-1234567
        r"\+\d{1,4}[ \t\-]?\d{1,4}[ \t\-]?\d{4,10}\b",
        // Area code in parentheses: (555) 123-4567
        r"\(\d{3,4}\)[ \t\-]?\d{3,4}[ \t\-]?\d{3,4}\b",
        // Grouped digits: 555-123-4567, 0123 456 789
        r"\b\d{3,4}[ \t\-]?\d{3,4}[ \t\-]?\d{3,4}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract every email address in the text, deduplicated in order of appearance.
pub fn extract_emails(text: &str) -> Vec<String> {
    extract_emails_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_emails`].
pub(crate) fn extract_emails_with_config(text: &str, config: &ParsingConfig) -> Vec<String> {
    let re = config.email_re.as_ref().unwrap_or(&EMAIL_RE);
    let emails = re
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches('.').to_string())
        .collect();
    dedup_preserving_order(emails)
}

/// Extract phone numbers.
///
/// Every match of every pattern is kept with its whitespace collapsed, then
/// duplicates are removed. Overlapping matches from different patterns are
/// not merged.
pub fn extract_phones(text: &str) -> Vec<String> {
    let mut phones = Vec::new();
    for re in PHONE_PATTERNS.iter() {
        for m in re.find_iter(text) {
            let phone = collapse_whitespace(m.as_str());
            if !phone.is_empty() {
                phones.push(phone);
            }
        }
    }
    dedup_preserving_order(phones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingConfigBuilder;

    #[test]
    fn test_emails_deduplicated() {
        assert_eq!(extract_emails("contact: a@b.com, a@b.com"), vec!["a@b.com"]);
    }

    #[test]
    fn test_emails_in_order() {
        let text = "Email: jane.doe@example.com\nAlt: j_doe+cv@mail.example.org.";
        assert_eq!(
            extract_emails(text),
            vec!["jane.doe@example.com", "j_doe+cv@mail.example.org"]
        );
    }

    #[test]
    fn test_custom_email_regex() {
        let config = ParsingConfigBuilder::new()
            .email_regex(r"[a-z]+@corp\.example")
            .build()
            .unwrap();
        let text = "jane@corp.example, jane@gmail.com";
        assert_eq!(
            extract_emails_with_config(text, &config),
            vec!["jane@corp.example"]
        );
    }

    #[test]
    fn test_international_phone() {
        let phones = extract_phones("Phone: +44 20 79460958");
        assert_eq!(phones[0], "+44 20 79460958");
    }

    #[test]
    fn test_parenthesized_phone() {
        let phones = extract_phones("Call (555) 123-4567 today");
        assert!(phones.contains(&"(555) 123-4567".to_string()));
    }

    #[test]
    fn test_grouped_phone_deduplicated() {
        let phones = extract_phones("555-123-4567 / 555-123-4567");
        assert_eq!(phones, vec!["555-123-4567"]);
    }

    #[test]
    fn test_no_phone() {
        assert!(extract_phones("Jane Doe, Software Engineer").is_empty());
    }
}
