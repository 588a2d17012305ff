use std::io::Write;

use owo_colors::OwoColorize;
use serde_json::Value;

use cvsift_parsing::{DocumentOutcome, OutputMapping, ParseResponse, SectionKind};

#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print one parsed document: a heading, its notes, then every field.
pub fn print_response(
    w: &mut dyn Write,
    response: &ParseResponse,
    color: ColorMode,
) -> std::io::Result<()> {
    let title = response
        .filename
        .as_deref()
        .or(response.profile_url.as_deref())
        .unwrap_or("(input)");

    if color.enabled() {
        writeln!(w, "{}", title.bold().cyan())?;
    } else {
        writeln!(w, "{}", title)?;
    }

    for note in &response.notes {
        if color.enabled() {
            writeln!(w, "  {}", note.yellow())?;
        } else {
            writeln!(w, "  note: {}", note)?;
        }
    }

    print_mapping(w, &response.cv_data, color)
}

/// Print every key of an output mapping, lists as indented bullets.
pub fn print_mapping(w: &mut dyn Write, mapping: &OutputMapping, color: ColorMode) -> std::io::Result<()> {
    for (key, value) in mapping {
        let label = key.replace('_', " ");
        match value {
            Value::Array(items) => {
                write_label(w, &label, color)?;
                writeln!(w)?;
                for item in items {
                    writeln!(w, "    - {}", scalar(item))?;
                }
            }
            Value::Object(groups) => {
                write_label(w, &label, color)?;
                writeln!(w)?;
                for (group, items) in groups {
                    let joined = match items {
                        Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(", "),
                        other => scalar(other),
                    };
                    if color.enabled() {
                        writeln!(w, "    {}: {}", group.dimmed(), joined)?;
                    } else {
                        writeln!(w, "    {}: {}", group, joined)?;
                    }
                }
            }
            other => {
                write_label(w, &label, color)?;
                writeln!(w, " {}", scalar(other))?;
            }
        }
    }
    Ok(())
}

fn write_label(w: &mut dyn Write, label: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        write!(w, "  {}", format!("{label}:").bold())
    } else {
        write!(w, "  {label}:")
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Print a batch: each document in input order, then a one-line tally.
pub fn print_outcomes(
    w: &mut dyn Write,
    outcomes: &[DocumentOutcome],
    color: ColorMode,
) -> std::io::Result<()> {
    for (i, outcome) in outcomes.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        match outcome {
            DocumentOutcome::Parsed(response) => print_response(w, response, color)?,
            DocumentOutcome::Failed { filename, error } => {
                if color.enabled() {
                    writeln!(w, "{} {}", filename.bold().red(), error.red())?;
                } else {
                    writeln!(w, "{} FAILED: {}", filename, error)?;
                }
            }
        }
    }

    let parsed = outcomes.iter().filter(|o| o.is_parsed()).count();
    let failed = outcomes.len() - parsed;
    writeln!(w)?;
    if color.enabled() {
        write!(w, "{} parsed", parsed.to_string().green())?;
        if failed > 0 {
            write!(w, ", {} failed", failed.to_string().red())?;
        }
        writeln!(w)?;
    } else {
        writeln!(w, "{} parsed, {} failed", parsed, failed)?;
    }
    Ok(())
}

/// Print which sections were located, with a short preview of each body.
pub fn print_sections(
    w: &mut dyn Write,
    title: &str,
    sections: &[(SectionKind, Option<String>)],
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "SECTIONS:".bold().cyan(), title)?;
    } else {
        writeln!(w, "SECTIONS: {}", title)?;
    }

    for (kind, body) in sections {
        match body {
            Some(body) => {
                let preview = preview(body, 60);
                let chars = body.chars().count();
                if color.enabled() {
                    writeln!(
                        w,
                        "  {:<16} {} {}",
                        kind.label(),
                        format!("{chars} chars").dimmed(),
                        preview
                    )?;
                } else {
                    writeln!(w, "  {:<16} {} chars {}", kind.label(), chars, preview)?;
                }
            }
            None => {
                if color.enabled() {
                    writeln!(w, "  {:<16} {}", kind.label(), "not found".dimmed())?;
                } else {
                    writeln!(w, "  {:<16} not found", kind.label())?;
                }
            }
        }
    }
    Ok(())
}

/// First line of `body`, cut to `max` characters.
fn preview(body: &str, max: usize) -> String {
    let first = body.lines().next().unwrap_or("").trim();
    if first.chars().count() > max {
        let cut: String = first.chars().take(max).collect();
        format!("{cut}...")
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvsift_parsing::SourceKind;
    use serde_json::json;

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_print_response_plain() {
        let mut data = OutputMapping::new();
        data.insert("name".into(), json!("Jane Doe"));
        data.insert("skills".into(), json!(["Rust", "Go"]));
        data.insert("skill_categories".into(), json!({"Languages": ["Rust", "Go"]}));
        let response = ParseResponse::new(SourceKind::CvFile, data).with_filename("jane.txt");

        let out = render(|w| print_response(w, &response, ColorMode(false)));
        assert_eq!(
            out,
            "jane.txt\n  name: Jane Doe\n  skills:\n    - Rust\n    - Go\n  skill categories:\n    Languages: Rust, Go\n"
        );
    }

    #[test]
    fn test_print_outcomes_tally() {
        let outcomes = vec![
            DocumentOutcome::Parsed(ParseResponse::new(SourceKind::CvFile, OutputMapping::new())),
            DocumentOutcome::Failed {
                filename: "a.docx".into(),
                error: "unsupported format: .docx".into(),
            },
        ];
        let out = render(|w| print_outcomes(w, &outcomes, ColorMode(false)));
        assert!(out.contains("a.docx FAILED: unsupported format: .docx"));
        assert!(out.ends_with("1 parsed, 1 failed\n"));
    }

    #[test]
    fn test_print_sections_marks_missing() {
        let sections = vec![
            (SectionKind::Skills, Some("Python, Go".to_string())),
            (SectionKind::Languages, None),
        ];
        let out = render(|w| print_sections(w, "cv.txt", &sections, ColorMode(false)));
        assert!(out.starts_with("SECTIONS: cv.txt\n"));
        assert!(out.contains("10 chars Python, Go"));
        assert!(out.contains("not found"));
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("abcdef\nsecond", 3), "abc...");
        assert_eq!(preview("short", 10), "short");
    }
}
