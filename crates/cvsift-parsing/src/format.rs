//! Turning a [`ProfileRecord`] into the flat output mapping.
//!
//! Keys are emitted in a fixed order and only when their value is non-empty,
//! so absence (not null) means "not found".

use serde_json::{Map, Value};

use cvsift_core::{EducationEntry, ExperienceEntry, ParseVariant, ProfileRecord};

use crate::config::ParsingConfig;
use crate::text_processing::{display_name_from_slug, truncate_chars};
use crate::url::display_name_from_url;

/// The output shape shared by CV and profile parses.
pub type OutputMapping = Map<String, Value>;

/// Where a synthesised name came from when nothing else was extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFallback {
    /// Derived from the `/in/<slug>` part of the profile URL, or a placeholder.
    ProfileUrl,
    /// Derived from the source file stem.
    SourceName,
}

/// Format a record with default settings.
pub fn format_record(record: &ProfileRecord) -> OutputMapping {
    format_with_fallback(record, &ParsingConfig::default()).0
}

/// Format a record, reporting whether a fallback name had to be synthesised.
pub fn format_with_fallback(
    record: &ProfileRecord,
    config: &ParsingConfig,
) -> (OutputMapping, Option<NameFallback>) {
    let mut out = OutputMapping::new();

    put_str(&mut out, "name", &record.name);
    put_list(&mut out, "email", &record.email);
    put_list(&mut out, "phone", &record.phone);
    put_str(&mut out, "location", &record.location);
    put_list(&mut out, "skills", &record.skills);

    let education: Vec<String> = record
        .education
        .iter()
        .filter_map(|e| education_display(e, record.variant))
        .collect();
    put_list(&mut out, "education", &education);

    let experience: Vec<String> = record
        .experience
        .iter()
        .filter_map(|e| experience_display(e, record.variant, config.description_max_chars))
        .collect();
    put_list(&mut out, "experience", &experience);

    put_str(&mut out, "headline", &record.headline);
    put_str(&mut out, "summary", &record.summary);
    if let Some(url) = &record.source_url {
        put_str(&mut out, "profile_url", url);
    }
    put_list(&mut out, "certifications", &record.certifications);
    put_list(&mut out, "languages", &record.languages);
    put_str(&mut out, "connections", &record.connections);
    put_list(&mut out, "accomplishments", &record.accomplishments);

    let categories: Map<String, Value> = record
        .skill_categories
        .iter()
        .filter(|c| !c.name.is_empty() && !c.skills.is_empty())
        .map(|c| (c.name.clone(), Value::from(c.skills.clone())))
        .collect();
    if !categories.is_empty() {
        out.insert("skill_categories".into(), Value::Object(categories));
    }

    let fallback = apply_name_fallback(&mut out, record);
    tracing::debug!(fields = out.len(), ?fallback, "formatted record");
    (out, fallback)
}

fn apply_name_fallback(out: &mut OutputMapping, record: &ProfileRecord) -> Option<NameFallback> {
    if out.len() == 1 && out.contains_key("profile_url") {
        let name = record.source_url.as_deref().map(display_name_from_url)?;
        tracing::info!(name = %name, "only a profile URL was extracted, naming from URL");
        let mut named = OutputMapping::new();
        named.insert("name".into(), Value::String(name));
        named.extend(std::mem::take(out));
        *out = named;
        return Some(NameFallback::ProfileUrl);
    }

    if out.is_empty() {
        let stem = record.source_name.as_deref().map(file_stem)?;
        let name = display_name_from_slug(stem);
        if name.is_empty() {
            return None;
        }
        tracing::info!(name = %name, "nothing extracted, naming from file name");
        out.insert("name".into(), Value::String(name));
        return Some(NameFallback::SourceName);
    }

    None
}

fn file_stem(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

fn put_str(out: &mut OutputMapping, key: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        out.insert(key.into(), Value::String(value.to_string()));
    }
}

fn put_list(out: &mut OutputMapping, key: &str, values: &[String]) {
    let values: Vec<Value> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| Value::String(v.to_string()))
        .collect();
    if !values.is_empty() {
        out.insert(key.into(), Value::Array(values));
    }
}

/// `title at company (dates)`, using whichever parts are present.
fn headline_parts(title: Option<&str>, company: Option<&str>, dates: Option<&str>) -> String {
    let mut text = String::new();
    if let Some(title) = title {
        text.push_str(title);
    }
    if let Some(company) = company {
        if !text.is_empty() {
            text.push_str(" at ");
        }
        text.push_str(company);
    }
    if let Some(dates) = dates {
        if text.is_empty() {
            text.push_str(dates);
        } else {
            text.push_str(&format!(" ({})", dates));
        }
    }
    text
}

/// Display string for one experience entry.
///
/// Profile entries also carry ` | location` and a truncated ` - description`,
/// and are dropped when they have neither company nor title. CV entries with
/// no structure show the first line of their raw block.
pub fn experience_display(
    entry: &ExperienceEntry,
    variant: ParseVariant,
    description_max_chars: usize,
) -> Option<String> {
    let title = entry.title.as_deref().filter(|s| !s.is_empty());
    let company = entry.company.as_deref().filter(|s| !s.is_empty());
    let dates = entry.dates.as_deref().filter(|s| !s.is_empty());

    match variant {
        ParseVariant::Document => {
            let text = headline_parts(title, company, dates);
            if !text.is_empty() {
                return Some(text);
            }
            entry
                .raw
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
        }
        ParseVariant::Profile => {
            if title.is_none() && company.is_none() {
                return None;
            }
            let mut text = headline_parts(title, company, dates);
            if let Some(location) = entry.location.as_deref().filter(|s| !s.is_empty()) {
                text.push_str(&format!(" | {}", location));
            }
            let description = entry.description.join(" ");
            if !description.trim().is_empty() {
                text.push_str(" - ");
                text.push_str(&truncate_chars(description.trim(), description_max_chars));
            }
            Some(text)
        }
    }
}

/// Display string for one education entry.
///
/// CV entries keep their raw text. Profile entries read
/// `degree in field at school (dates)`, omitting absent parts.
pub fn education_display(entry: &EducationEntry, variant: ParseVariant) -> Option<String> {
    if variant == ParseVariant::Document || entry.is_raw_only() {
        let raw = entry.raw.trim();
        return (!raw.is_empty()).then(|| raw.to_string());
    }

    let degree = entry.degree.as_deref().filter(|s| !s.is_empty());
    let field = entry.field.as_deref().filter(|s| !s.is_empty());
    let school = entry.school.as_deref().filter(|s| !s.is_empty());

    let mut text = match (degree, field) {
        (Some(degree), Some(field)) => format!("{} in {}", degree, field),
        (Some(degree), None) => degree.to_string(),
        _ => String::new(),
    };
    if let Some(school) = school {
        if !text.is_empty() {
            text.push_str(" at ");
        }
        text.push_str(school);
    }
    if text.is_empty() {
        return None;
    }
    if let Some(dates) = entry.dates.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!(" ({})", dates));
    }
    Some(text)
}
