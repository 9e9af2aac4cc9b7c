//! Realtor.com.
//!
//! Fields are addressed by `data-testid`. Realtor often serves a bot check
//! instead of the listing; such pages are still extracted, with most fields
//! coming from the URL, and flagged in `raw_data`.

use listings_core::PropertyType;
use serde_json::{Map, Value};

use super::insert_text;
use crate::document::Document;
use crate::extract::profile::{AdditionalData, SourceProfile};
use crate::text::{self, details::join_details};

pub static PROFILE: SourceProfile = SourceProfile {
    id: "realtor",
    name_selectors: &["[data-testid=\"address\"]", "h1"],
    price_selectors: &["[data-testid=\"list-price\"]", "[data-testid=\"price\"]", ".Price__Component"],
    price_labels: &["List Price", "Price"],
    acreage_selectors: &["[data-testid=\"property-meta-lot-size\"]", "[data-testid=\"lot-size\"]"],
    acreage_labels: &["Lot Size", "Lot size area"],
    location_selectors: &["[data-testid=\"city-state\"]", "[data-testid=\"address\"]"],
    location_labels: &[],
    description_selectors: &["[data-testid=\"description\"]"],
    property_type_selectors: &["[data-testid=\"property-type\"]"],
    date_selectors: &["[data-testid=\"listing-date\"]", ".list-date"],
    date_labels: &["Listed", "Time on realtor.com"],
    default_property_type: PropertyType::SingleFamily,
    refine_name,
    location_hints,
    additional_data,
};

/// Page text that marks a bot check rather than a listing.
const BLOCKING_PHRASES: &[&str] =
    &["captcha", "access denied", "pardon our interruption", "are you a robot", "security check", "please verify"];

/// Bot-check headings are not names; an empty result defers to the URL.
fn refine_name(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if BLOCKING_PHRASES.iter().any(|phrase| lower.contains(phrase)) { String::new() } else { raw.trim().to_string() }
}

/// The fetcher injects `<meta name="url-extracted-location">` into blocked pages.
fn location_hints(doc: &Document) -> Vec<String> {
    doc.meta("url-extracted-location").into_iter().collect()
}

/// True when the page is a bot check or was flagged as blocked by the fetcher.
pub fn blocking_detected(doc: &Document) -> bool {
    let flagged = doc.meta("extraction-status").is_some_and(|status| status.starts_with("blocked"));
    let lower = doc.text().to_lowercase();
    flagged || BLOCKING_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

fn additional_data(doc: &Document, description: Option<&str>) -> AdditionalData {
    let mut raw = Map::new();

    let meta: Vec<String> = ["property-meta-beds", "property-meta-baths", "property-meta-sqft"]
        .iter()
        .filter_map(|id| doc.select_text(&format!("[data-testid=\"{id}\"]")))
        .collect();
    let house_details = text::house_details(&meta.join(" ")).or_else(|| description.and_then(text::house_details));

    let features = doc.select_all_text("[data-testid=\"property-features\"] li");
    if !features.is_empty() {
        raw.insert("features".into(), Value::Array(features.iter().cloned().map(Value::String).collect()));
    }
    insert_text(&mut raw, "property_type_text", doc.select_text("[data-testid=\"property-type\"]"));

    let blocked = blocking_detected(doc);
    if blocked {
        tracing::warn!("Realtor page looks blocked; continuing with limited extraction");
    }
    raw.insert("blocking_detected".into(), Value::Bool(blocked));

    let farm_details = description.and_then(text::farm_details).or_else(|| join_details(features));

    AdditionalData { house_details, farm_details, raw }
}
