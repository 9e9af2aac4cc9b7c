//! Free-text house and farm detail summaries.

use std::sync::LazyLock;

use regex::Regex;

const DETAIL_SEPARATOR: &str = " | ";

/// Farm summaries keep the first few facts only.
const MAX_FARM_DETAILS: usize = 3;

static BEDROOMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:bed(?:room)?s?|br)\b").expect("invalid regex"));

static BATHROOMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:bath(?:room)?s?|ba)\b").expect("invalid regex"));

static LIVING_AREA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*)\s*(?:sq\.?\s*ft\.?|sqft|square\s+feet)(?:\s+(?:living|home|house))?")
        .expect("invalid regex")
});

static YEAR_BUILT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:built\s+in|year\s+built:?)\s*(\d{4})").expect("invalid regex"));

static GARAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)[\s-]*(?:car|bay)\s+garage|\bgarage\b").expect("invalid regex"));

/// Farm facts, each rendered from its whole match.
static FARM_FACTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\d+(?:\.\d+)?\s*acres?\s+(?:of\s+)?(?:tillable|cropland|pasture|woodland|forest(?:ed)?(?:\s+land)?|hayfields?)",
        r"(?i)\b(?:dairy\s+|horse\s+|post[\s-]and[\s-]beam\s+)?barns?\b",
        r"(?i)\bstables?\b",
        r"(?i)\bsilos?\b",
        r"(?i)\bfarmhouse\b",
        r"(?i)\birrigat(?:ion|ed)\b",
        r"(?i)\bfenc(?:ing|ed)\b",
        r"(?i)\bgrazing\b",
        r"(?i)\blivestock\b",
        r"(?i)\bcertified\s+organic\b|\borganic\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid regex"))
    .collect()
});

/// Terrain and water features Land and Farm listings advertise.
pub const LAND_FEATURES: &[&str] = &[
    "wooded",
    "cleared",
    "fenced",
    "pasture",
    "cropland",
    "wetlands",
    "pond",
    "stream",
    "creek",
    "waterfront",
    "lake",
    "mountain",
    "view",
];

/// `"3 bed | 2 bath"` style summary, from whichever counts are present.
pub fn extract_bed_bath(text: &str) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(c) = BEDROOMS.captures(text) {
        parts.push(format!("{} bed", &c[1]));
    }
    if let Some(c) = BATHROOMS.captures(text) {
        parts.push(format!("{} bath", &c[1]));
    }
    join_details(parts)
}

/// Bedrooms, bathrooms, living area, year built and garage, when mentioned.
pub fn house_details(text: &str) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(bed_bath) = extract_bed_bath(text) {
        parts.push(bed_bath);
    }
    if let Some(c) = LIVING_AREA.captures(text) {
        parts.push(format!("{} sq ft", &c[1]));
    }
    if let Some(c) = YEAR_BUILT.captures(text) {
        parts.push(format!("Built {}", &c[1]));
    }
    if let Some(c) = GARAGE.captures(text) {
        parts.push(match c.get(1) {
            Some(cars) => format!("{}-car garage", cars.as_str()),
            None => "Garage".to_string(),
        });
    }
    join_details(parts)
}

/// Up to three farm facts such as tillable acres or barns, in pattern order.
pub fn farm_details(text: &str) -> Option<String> {
    let parts = FARM_FACTS
        .iter()
        .filter_map(|pattern| pattern.find(text))
        .map(|m| capitalize(m.as_str()))
        .take(MAX_FARM_DETAILS)
        .collect();
    join_details(parts)
}

/// Land features mentioned in `text`, in list order.
pub fn land_features(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    LAND_FEATURES
        .iter()
        .copied()
        .filter(|feature| {
            lower
                .match_indices(feature)
                .any(|(i, _)| !lower[..i].chars().next_back().is_some_and(char::is_alphanumeric))
        })
        .collect()
}

/// Joins non-empty parts with `" | "`.
pub fn join_details(parts: Vec<String>) -> Option<String> {
    let parts: Vec<String> = parts.into_iter().filter(|p| !p.trim().is_empty()).collect();
    if parts.is_empty() { None } else { Some(parts.join(DETAIL_SEPARATOR)) }
}

fn capitalize(s: &str) -> String {
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
