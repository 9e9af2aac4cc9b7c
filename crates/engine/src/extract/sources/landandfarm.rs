//! Land and Farm (landandfarm.com).
//!
//! The site ships hashed class names for its title, price and description
//! blocks; readable classes cover the location container and spec sections.

use std::sync::LazyLock;

use listings_core::PropertyType;
use regex::Regex;
use serde_json::{Map, Value};

use super::{cut_at, insert_text};
use crate::document::Document;
use crate::extract::profile::{AdditionalData, SourceProfile};
use crate::text::{self, details::join_details};

const TITLE: &str = "._2233487";

pub static PROFILE: SourceProfile = SourceProfile {
    id: "landandfarm",
    name_selectors: &[TITLE, "h1.property-title", "h1"],
    price_selectors: &[".cff3611", ".property-price", ".price"],
    price_labels: &["Price", "Asking Price"],
    acreage_selectors: &[TITLE, ".property-specs", ".property-details .details-section"],
    acreage_labels: &["Acres", "Acreage", "Lot Size"],
    location_selectors: &[".location-container .property-address", ".property-address"],
    location_labels: &["Location", "Address"],
    description_selectors: &["._5ae12cd"],
    property_type_selectors: &[".property-type", "._094c3a5"],
    date_selectors: &[".listing-date", ".property-date", "span.date"],
    date_labels: &["Updated", "Date Added"],
    default_property_type: PropertyType::Land,
    refine_name,
    location_hints,
    additional_data,
};

/// `"45 Acres in Unity, ME"` style headings.
static TITLE_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+([\w\s]+?),\s+([A-Z]{2})\b").expect("invalid regex"));

/// Page titles read `"Name | Location | Land and Farm"`.
fn refine_name(raw: &str) -> String {
    cut_at(raw, &[" | "])
}

fn location_hints(doc: &Document) -> Vec<String> {
    let mut hints = Vec::new();

    if let (Some(city), Some(state)) =
        (doc.select_text(".location-container .city-name"), doc.select_text(".location-container .state-name"))
    {
        hints.push(format!("{city}, {state}"));
    }

    if let Some(title) = doc.select_text(TITLE)
        && let Some(c) = TITLE_LOCATION.captures(&title)
    {
        hints.push(format!("{}, {}", c[1].trim(), &c[2]));
    }

    if let Some(segment) = doc.title().and_then(|t| t.split(" | ").nth(1).map(str::to_string)) {
        hints.push(segment);
    }

    hints
}

fn additional_data(doc: &Document, description: Option<&str>) -> AdditionalData {
    let mut raw = Map::new();

    let specs = [".property-details", ".property-specs"]
        .iter()
        .flat_map(|css| doc.select_all_text(css))
        .chain(description.map(str::to_string))
        .collect::<Vec<_>>()
        .join(" ");
    let house_details = text::house_details(&specs);

    let mut features: Vec<String> = doc.select_all_text(".property-features li");
    for feature in text::land_features(&specs) {
        if !features.iter().any(|f| f.eq_ignore_ascii_case(feature)) {
            features.push(feature.to_string());
        }
    }
    if !features.is_empty() {
        raw.insert("land_features".into(), Value::Array(features.iter().cloned().map(Value::String).collect()));
    }
    insert_text(&mut raw, "title", doc.select_text(TITLE));

    let farm_details = description.and_then(text::farm_details).or_else(|| {
        join_details(features.iter().map(|f| capitalize_first(f)).collect())
    });

    AdditionalData { house_details, farm_details, raw }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
