use once_cell::sync::Lazy;
use regex::Regex;

use cvsift_core::{ExperienceEntry, SectionKind};

use crate::config::ParsingConfig;
use crate::dates::{DateSpan, find_date_ranges, first_date_range};
use crate::text_processing::{dedup_preserving_order, strip_trailing_separators};

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "Software Engineer at Acme", "Data Analyst - Globex", "Designer, Initech"
        r"(?m)^[ \t•\*\-]*((?:[A-Z][a-z]+|[A-Z]+)(?:[ \t]+[A-Za-z&,\-]+){0,4})[ \t]*(?:[-–—][ \t]*|,[ \t]+|\b(?i:at|for|with)[ \t]+)",
        // Lines led by a seniority or role keyword.
        r"(?m)^[ \t•\*\-]*((?i:Senior|Junior|Lead|Chief|Principal|Head|Director|Manager|Engineer|Developer|Designer|Consultant|Analyst|Specialist|Coordinator)(?:[ \t]+[A-Za-z&,\-]+){1,5})",
        // "Job Title: Backend Developer"
        r"\b(?i:job[ \t]+title|position|role|title)[ \t]*:?[ \t]*([A-Za-z&,\-]+(?:[ \t]+[A-Za-z&,\-]+){1,5})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static COMPANY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "at Acme Corp", "with Globex Group"
        r"\b(?i:at|with|for)[ \t]+([A-Z][A-Za-z0-9&.'\-]*(?:[ \t]+[A-Z0-9&][A-Za-z0-9&.'\-]*)*)",
        // "Company: Initech"
        r"\b(?i:company|employer|organization)[ \t]*:[ \t]*([A-Z][A-Za-z0-9&.,' \-]*[A-Za-z0-9.])",
        // "Sales Lead - Vandelay Industries Inc"
        r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){0,2}[ \t]*[-–—,][ \t]*([A-Z][A-Za-z0-9&.' \-]*?[ \t](?:Inc|LLC|Ltd|GmbH|Company|Corp|Corporation|Group|Agency|Services)\b\.?)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RESPONSIBILITY_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\b(?:responsibilities|duties|achievements)[ \t]*:\s*(.*?)(?:\n[ \t]*\n|\z)")
        .unwrap()
});

static BULLET_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:•|-|\*|\d+\.)[ \t]*(.+?)[ \t]*$").unwrap());

static BLANK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

static FALLBACK_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*•|\n[ \t]*\n").unwrap());

/// Parse the work history of a CV into entries.
///
/// 1. Locate the experience section (whole text if absent)
/// 2. Anchor entries on date ranges, else on job-title lines
/// 3. Without anchors, split on bullets and blank lines
/// 4. Parse each block for dates, title, company and responsibilities
/// 5. If no block produced anything, fall back to bare job titles
pub fn parse_experience(text: &str) -> Vec<ExperienceEntry> {
    parse_experience_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`parse_experience`].
pub(crate) fn parse_experience_with_config(
    text: &str,
    config: &ParsingConfig,
) -> Vec<ExperienceEntry> {
    let section = config
        .segmenter
        .locate(text, SectionKind::Experience.synonyms());
    let section = section.as_deref().unwrap_or(text);

    let mut anchors = find_date_ranges(section);
    if anchors.is_empty() {
        anchors = title_anchors(section);
        tracing::debug!(count = anchors.len(), "experience anchored on job titles");
    } else {
        tracing::debug!(count = anchors.len(), "experience anchored on date ranges");
    }

    let blocks: Vec<&str> = if anchors.is_empty() {
        FALLBACK_SPLIT_RE.split(section).collect()
    } else {
        anchor_blocks(section, &anchors)
    };

    let entries: Vec<ExperienceEntry> = blocks
        .into_iter()
        .map(str::trim)
        .filter(|b| b.chars().count() >= config.min_block_chars)
        .map(parse_block)
        .collect();

    if !entries.is_empty() {
        return entries;
    }

    standalone_titles(text)
        .into_iter()
        .map(|title| ExperienceEntry {
            raw: title.clone(),
            title: Some(title),
            ..Default::default()
        })
        .collect()
}

fn title_anchors(text: &str) -> Vec<DateSpan> {
    let mut spans: Vec<DateSpan> = TITLE_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| DateSpan {
            start: m.start(),
            end: m.end(),
        })
        .collect();
    spans.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));
    spans.dedup_by(|next, prev| next.start < prev.end);
    spans
}

/// Split `text` into one block per anchor.
///
/// A block starts after the last blank line between the previous anchor and
/// its own. Without a blank line, the first block starts at the top of the
/// text and later blocks start at the beginning of the anchor's line. Each
/// block runs until the next one starts.
fn anchor_blocks<'a>(text: &'a str, anchors: &[DateSpan]) -> Vec<&'a str> {
    let mut starts = Vec::with_capacity(anchors.len());
    for (i, anchor) in anchors.iter().enumerate() {
        let lower = if i == 0 { 0 } else { anchors[i - 1].end };
        let region = &text[lower..anchor.start];
        let start = if let Some(blank) = BLANK_LINE_RE.find_iter(region).last() {
            lower + blank.end()
        } else if i == 0 {
            0
        } else {
            lower + region.rfind('\n').map_or(0, |p| p + 1)
        };
        starts.push(start);
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        let caps = re.captures(text)?;
        let value = strip_trailing_separators(caps.get(1)?.as_str());
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn parse_block(block: &str) -> ExperienceEntry {
    let company = first_capture(&COMPANY_PATTERNS, block).map(|c| {
        let cut = [" - ", " – ", " — ", " | "]
            .iter()
            .filter_map(|sep| c.find(sep))
            .min()
            .unwrap_or(c.len());
        strip_trailing_separators(&c[..cut]).to_string()
    });

    ExperienceEntry {
        title: first_capture(&TITLE_PATTERNS, block),
        company: company.filter(|c| !c.is_empty()),
        dates: first_date_range(block),
        location: None,
        description: responsibilities(block),
        raw: block.to_string(),
    }
}

/// Responsibility paragraphs after a label, then bullet or numbered items.
fn responsibilities(block: &str) -> Vec<String> {
    let labelled = RESPONSIBILITY_LABEL_RE
        .captures_iter(block)
        .filter_map(|caps| caps.get(1));
    let bullets = BULLET_ITEM_RE
        .captures_iter(block)
        .filter_map(|caps| caps.get(1));

    labelled
        .map(|m| m.as_str().trim().to_string())
        .chain(bullets.map(|m| m.as_str().trim().to_string()))
        .filter(|r| r.chars().count() > 10)
        .collect()
}

/// Every distinct job-title match in the whole text.
fn standalone_titles(text: &str) -> Vec<String> {
    let titles = TITLE_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_trailing_separators(m.as_str()).to_string())
        .filter(|t| !t.is_empty())
        .collect();
    dedup_preserving_order(titles)
}
