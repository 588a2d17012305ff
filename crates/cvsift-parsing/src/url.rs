use once_cell::sync::Lazy;
use regex::Regex;

use crate::text_processing::display_name_from_slug;

static PROFILE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?linkedin\.com/(?:in/[\w\-%]+|profile/view\?id=\d+)")
        .unwrap()
});

static PROFILE_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"linkedin\.com/in/([^/?#]+)").unwrap());

/// Whether `url` points at a public profile page (`/in/<slug>` or
/// `/profile/view?id=<digits>`). Anything may follow the matched prefix.
pub fn validate_profile_url(url: &str) -> bool {
    PROFILE_URL_RE.is_match(url.trim())
}

/// The `/in/<slug>` part of a profile URL, if it has one.
pub fn profile_slug(url: &str) -> Option<&str> {
    PROFILE_SLUG_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|slug| !slug.is_empty())
}

/// Name used when a profile URL has no usable slug (`/profile/view?id=...`).
pub const UNKNOWN_PROFILE_NAME: &str = "Unknown";

/// Display name derived from a profile URL slug (`jane-doe-123` → `Jane Doe 123`),
/// or [`UNKNOWN_PROFILE_NAME`] when the URL carries no slug.
pub fn display_name_from_url(url: &str) -> String {
    profile_slug(url)
        .map(display_name_from_slug)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_PROFILE_NAME.to_string())
}
