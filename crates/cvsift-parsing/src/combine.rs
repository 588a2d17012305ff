use serde_json::Value;

use crate::format::OutputMapping;

/// Keys whose profile value replaces the résumé's.
const PROFILE_FIELDS: &[&str] = &[
    "profile_url",
    "headline",
    "summary",
    "certifications",
    "languages",
    "connections",
];

/// List keys merged from both sides.
const UNION_FIELDS: &[&str] = &["skills", "education", "experience"];

/// Merge a formatted résumé with a formatted profile.
///
/// The résumé is the base. Profile-only fields are copied over when the
/// profile has them; skills, education and experience are unioned with the
/// résumé's items first and duplicates removed.
pub fn combine_outputs(resume: &OutputMapping, profile: &OutputMapping) -> OutputMapping {
    let mut combined = resume.clone();

    for &key in PROFILE_FIELDS {
        if let Some(value) = profile.get(key).filter(|v| !is_empty_value(v)) {
            combined.insert(key.to_string(), value.clone());
        }
    }

    for &key in UNION_FIELDS {
        let Some(Value::Array(extra)) = profile.get(key) else {
            continue;
        };
        let mut merged: Vec<Value> = match combined.get(key) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        for item in extra {
            if !merged.contains(item) {
                merged.push(item.clone());
            }
        }
        if !merged.is_empty() {
            combined.insert(key.to_string(), Value::Array(merged));
        }
    }

    tracing::debug!(
        resume_fields = resume.len(),
        profile_fields = profile.len(),
        combined_fields = combined.len(),
        "combined outputs"
    );
    combined
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
