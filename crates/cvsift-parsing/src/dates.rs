use once_cell::sync::Lazy;
use regex::Regex;

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec";

/// Date-range families, in precedence order: month-year, year-only, MM/YYYY.
static DATE_RANGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(&format!(
            r"(?i)\b(?:{m})\.?[\s,]+\d{{4}}\s*[-–—]\s*(?:Present|Current|Now|(?:{m})\.?[\s,]+\d{{4}})\b",
            m = MONTHS
        ))
        .unwrap(),
        Regex::new(r"(?i)\b\d{4}\s*[-–—]\s*(?:Present|Current|Now|\d{4})\b").unwrap(),
        Regex::new(r"(?i)\b\d{1,2}/\d{4}\s*[-–—]\s*(?:Present|Current|Now|\d{1,2}/\d{4})\b")
            .unwrap(),
    ]
});

/// A date range found in text, as a byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: usize,
    pub end: usize,
}

/// Find all date ranges from every family, sorted by position.
///
/// A match that starts inside an earlier match is dropped, so
/// `Jan 2020 - Present` yields one span rather than also anchoring on
/// `2020 - Present`.
pub fn find_date_ranges(text: &str) -> Vec<DateSpan> {
    let mut spans: Vec<DateSpan> = DATE_RANGE_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| DateSpan {
            start: m.start(),
            end: m.end(),
        })
        .collect();
    spans.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));

    let mut kept: Vec<DateSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.last().is_some_and(|prev| span.start < prev.end) {
            continue;
        }
        kept.push(span);
    }
    kept
}

/// The first date range in `text`, preferring earlier families over earlier positions.
pub fn first_date_range(text: &str) -> Option<String> {
    DATE_RANGE_PATTERNS
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_year_range() {
        assert_eq!(
            first_date_range("Acme\nJan 2020 - Present\n").as_deref(),
            Some("Jan 2020 - Present")
        );
        assert_eq!(
            first_date_range("March 2017 – December 2019").as_deref(),
            Some("March 2017 – December 2019")
        );
    }

    #[test]
    fn test_year_and_numeric_ranges() {
        assert_eq!(first_date_range("2015-2019").as_deref(), Some("2015-2019"));
        assert_eq!(
            first_date_range("03/2018 - 11/2020").as_deref(),
            Some("03/2018 - 11/2020")
        );
    }

    #[test]
    fn test_family_precedence() {
        let text = "2010 - 2012 then Feb 2013 - Now";
        assert_eq!(first_date_range(text).as_deref(), Some("Feb 2013 - Now"));
    }

    #[test]
    fn test_overlapping_anchors_collapse() {
        let text = "Jan 2020 - Present\nstuff\n2015 - 2019";
        let spans = find_date_ranges(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].start, 0);
        assert_eq!(&text[spans[1].start..spans[1].end], "2015 - 2019");
    }

    #[test]
    fn test_no_dates() {
        assert!(find_date_ranges("no dates here, just 2020").is_empty());
        assert!(first_date_range("Since 2020").is_none());
    }
}
