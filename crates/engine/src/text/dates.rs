//! Listing date discovery and parsing.

use std::sync::LazyLock;

use chrono::{Days, Months, NaiveDate};
use regex::Regex;

use crate::document::Document;

/// Phrases that introduce a listing date on any source.
pub const DATE_LABELS: &[&str] =
    &["Date Listed", "Date Posted", "Listed on", "Posted on", "Published", "Added", "Listed", "Posted"];

/// Elements that commonly hold a date when no source-specific selector hits.
pub const GENERIC_DATE_SELECTORS: &[&str] = &[".listing-date", ".post-date", ".published-date", ".date", "time"];

/// Characters after a label that may hold the date.
const LABEL_WINDOW: usize = 48;

static ISO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})").expect("invalid regex"));

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b")
        .expect("invalid regex")
});

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(\d{4})\b")
        .expect("invalid regex")
});

static SLASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("invalid regex"));

static DASHED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{1,2})-(\d{1,2})-(\d{4})\b").expect("invalid regex"));

static DOTTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b").expect("invalid regex"));

static RELATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s+(day|week|month|year)s?\s+ago\b").expect("invalid regex"));

static TODAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(today|yesterday)\b").expect("invalid regex"));

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)?.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn ymd(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

/// Parse the first date found in `text`.
///
/// Absolute formats: ISO (`2024-03-15`), month name (`March 15, 2024`,
/// `Sept. 3rd 2024`), day first (`15 March 2024`), `M/D/YYYY`, `M-D-YYYY`
/// and `D.M.YYYY`. Relative phrases (`3 weeks ago`, `yesterday`) resolve
/// against `today`.
pub fn parse_date_string(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(c) = ISO.captures(text) {
        if let Some(date) = c[2].parse().ok().and_then(|m| ymd(&c[1], m, &c[3])) {
            return Some(date);
        }
    }
    if let Some(c) = MONTH_DAY_YEAR.captures(text) {
        if let Some(date) = month_number(&c[1]).and_then(|m| ymd(&c[3], m, &c[2])) {
            return Some(date);
        }
    }
    if let Some(c) = DAY_MONTH_YEAR.captures(text) {
        if let Some(date) = month_number(&c[2]).and_then(|m| ymd(&c[3], m, &c[1])) {
            return Some(date);
        }
    }
    if let Some(c) = SLASHED.captures(text).or_else(|| DASHED.captures(text)) {
        if let Some(date) = c[1].parse().ok().and_then(|m| ymd(&c[3], m, &c[2])) {
            return Some(date);
        }
    }
    if let Some(c) = DOTTED.captures(text) {
        if let Some(date) = c[2].parse().ok().and_then(|m| ymd(&c[3], m, &c[1])) {
            return Some(date);
        }
    }
    if let Some(c) = RELATIVE.captures(text) {
        let amount: u32 = c[1].parse().ok()?;
        return match c[2].to_ascii_lowercase().as_str() {
            "day" => today.checked_sub_days(Days::new(amount.into())),
            "week" => today.checked_sub_days(Days::new(u64::from(amount) * 7)),
            "month" => today.checked_sub_months(Months::new(amount)),
            _ => today.checked_sub_months(Months::new(amount.checked_mul(12)?)),
        };
    }
    if let Some(c) = TODAY.captures(text) {
        return if c[1].eq_ignore_ascii_case("today") { Some(today) } else { today.checked_sub_days(Days::new(1)) };
    }
    None
}

/// Date following any of `labels` in `text`.
pub fn find_labeled_date<'a>(
    text: &str, labels: impl IntoIterator<Item = &'a str>, today: NaiveDate,
) -> Option<NaiveDate> {
    let lower = text.to_ascii_lowercase();
    for label in labels {
        let needle = label.to_ascii_lowercase();
        for (start, _) in lower.match_indices(&needle) {
            let after = start + needle.len();
            let window: String = text[after..].chars().take(LABEL_WINDOW).collect();
            let window = window.trim_start_matches([':', ' ']);
            if let Some(date) = parse_date_string(window, today) {
                tracing::debug!(label, %date, "Found labeled listing date");
                return Some(date);
            }
        }
    }
    None
}

/// Discover the listing date in a document.
///
/// Looks in source-specific date elements first, then scans the page text
/// after the shared and source-specific labels, then tries generic date
/// elements. Returns `None` when nothing parses; the caller decides the
/// fallback.
pub fn extract_listing_date(
    doc: &Document, selectors: &[&str], extra_labels: &[&str], today: NaiveDate,
) -> Option<NaiveDate> {
    let from_elements = |selectors: &[&str]| {
        selectors
            .iter()
            .flat_map(|css| doc.date_values(css))
            .find_map(|value| parse_date_string(&value, today))
    };

    from_elements(selectors)
        .or_else(|| find_labeled_date(doc.text(), extra_labels.iter().chain(DATE_LABELS).copied(), today))
        .or_else(|| from_elements(GENERIC_DATE_SELECTORS))
}
