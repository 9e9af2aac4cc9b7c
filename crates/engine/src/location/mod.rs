//! Location normalization and distance classification.
//!
//! Raw location text is resolved to `"Town, ST"` by pattern first and by
//! gazetteer lookup second. Distance buckets come from a geocoder and the
//! configured reference point; every failure there degrades to "Unknown".

pub mod distance;
pub mod geocode;

use std::sync::LazyLock;

use listings_core::gazetteer::{self, Gazetteer, ReferencePoint};
use listings_core::record::LOCATION_UNKNOWN;
use regex::Regex;

use crate::text::clean_html;

pub use distance::{DistanceReport, haversine_miles};
pub use geocode::{DisabledGeocoder, GazetteerGeocoder, GeocodeError, Geocoder, NominatimGeocoder, geocoder_for};

/// `Town, ST` with no commas inside the town part.
static TOWN_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z][A-Za-z .'\-]*?)\s*,\s*([A-Z]{2})\b").expect("invalid regex"));

/// `, Maine` and friends, written out in full.
static FULL_STATE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),\s*(maine|new hampshire|vermont|massachusetts|connecticut|rhode island)\b").expect("invalid regex")
});

static ZIP_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{5}(?:-\d{4})?\b").expect("invalid regex"));

/// Resolves locations against an immutable gazetteer.
pub struct LocationResolver<'a> {
    gazetteer: &'a Gazetteer,
    geocoder: &'a dyn Geocoder,
    reference: &'a ReferencePoint,
}

impl<'a> LocationResolver<'a> {
    pub fn new(gazetteer: &'a Gazetteer, geocoder: &'a dyn Geocoder, reference: &'a ReferencePoint) -> Self {
        Self { gazetteer, geocoder, reference }
    }

    pub fn gazetteer(&self) -> &'a Gazetteer {
        self.gazetteer
    }

    /// Canonical `"Town, ST"`, or `"Location Unknown"`.
    pub fn resolve(&self, raw: &str) -> String {
        self.try_resolve(raw).unwrap_or_else(|| LOCATION_UNKNOWN.to_string())
    }

    /// Canonical `"Town, ST"` when the text names one.
    ///
    /// A `Town, ST` pattern (full New England state names accepted) wins.
    /// The last such pair is used, so street addresses are skipped. Otherwise
    /// the longest known town mentioned anywhere in the text is used.
    pub fn try_resolve(&self, raw: &str) -> Option<String> {
        let cleaned = clean_html(raw);
        if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(LOCATION_UNKNOWN) {
            return None;
        }

        let without_zip = ZIP_CODE.replace_all(&cleaned, "");
        let normalized = FULL_STATE_NAME.replace_all(&without_zip, |c: &regex::Captures<'_>| {
            format!(", {}", gazetteer::state_code(&c[1]).unwrap_or("??"))
        });

        let pattern_match = TOWN_STATE
            .captures_iter(&normalized)
            .filter(|c| gazetteer::is_state_code(&c[2]))
            .last()
            .map(|c| self.canonical_town(c[1].trim(), &c[2]));
        if pattern_match.is_some() {
            return pattern_match;
        }

        let found = self.gazetteer.find_town(&normalized).map(|t| t.display());
        if let Some(location) = &found {
            tracing::debug!(raw = %cleaned, location = %location, "Inferred state from gazetteer");
        }
        found
    }

    /// Distance classification for a resolved location.
    ///
    /// A single geocoding attempt; errors and unknown places give "Unknown".
    pub fn distance(&self, location: &str) -> DistanceReport {
        if location == LOCATION_UNKNOWN {
            return DistanceReport::unknown(self.reference);
        }
        match self.geocoder.geocode(location) {
            Ok(Some(point)) => DistanceReport::measure(point, self.reference, &self.gazetteer.reference_points),
            Ok(None) => {
                tracing::debug!(location, "Geocoder has no coordinates");
                DistanceReport::unknown(self.reference)
            }
            Err(e) => {
                tracing::warn!(location, error = %e, "Geocoding failed; distance is unknown");
                DistanceReport::unknown(self.reference)
            }
        }
    }

    /// Canonical `"Town, ST"` for a captured `Town` group.
    ///
    /// The capture starts at the leftmost letter, so it may carry prose
    /// ("Located in Brunswick"). The longest trailing word run known to the
    /// gazetteer wins; otherwise the trailing run of capitalized words.
    fn canonical_town(&self, capture: &str, state: &str) -> String {
        let words: Vec<&str> = capture.split_whitespace().collect();
        let known = (0..words.len()).find_map(|start| self.gazetteer.town(&words[start..].join(" "), state));
        if let Some(town) = known {
            return town.display();
        }
        format!("{}, {}", title_case(&trailing_place_name(&words)), state)
    }
}

/// Place name at the end of `words`.
///
/// Single-case text (`WALDOBORO`, `east machias`) is taken whole; mixed-case
/// text keeps only its trailing capitalized words.
fn trailing_place_name(words: &[&str]) -> String {
    let joined = words.join(" ");
    let mixed = joined.chars().any(char::is_lowercase) && joined.chars().any(char::is_uppercase);
    if !mixed {
        return joined;
    }
    let start = words
        .iter()
        .rposition(|w| !w.chars().next().is_some_and(char::is_uppercase))
        .map_or(0, |i| i + 1);
    match &words[start..] {
        [] => words.last().map(|w| (*w).to_string()).unwrap_or_default(),
        run => run.join(" "),
    }
}

fn title_case(text: &str) -> String {
    if text.chars().any(|c| c.is_lowercase()) && text.chars().any(|c| c.is_uppercase()) {
        return text.to_string();
    }
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
