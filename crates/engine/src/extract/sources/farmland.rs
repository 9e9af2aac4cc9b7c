//! Maine Farmland Trust and New England Farmland Finder.
//!
//! Both sites run the same farmland listing template: a title heading, then
//! label/value blocks ("Total number of acres", "Location", "Acres of
//! cropland", ...). Values are often bare numbers or "Not specified".

use listings_core::PropertyType;
use serde_json::{Map, Value};

use super::{cut_at, insert_text};
use crate::document::Document;
use crate::extract::profile::{AdditionalData, SourceProfile};
use crate::text::{self, details::join_details, parse_acres};

pub static PROFILE: SourceProfile = SourceProfile {
    id: "farmland",
    name_selectors: &["h1.farmland__title", ".property-title", ".page-title", "h1"],
    price_selectors: &[".farmland__price", ".field-name-field-price"],
    price_labels: &["Price", "Asking price", "Sale price", "Lease rate"],
    acreage_selectors: &[".farmland__acreage", ".field-name-field-acres"],
    acreage_labels: &["Total number of acres", "Total acres", "Acreage", "Property size", "Land area"],
    location_selectors: &[".farmland__location", ".field-name-field-location"],
    location_labels: &["Location", "Town", "Property location", "County"],
    description_selectors: &[".farmland__description", ".field-name-body"],
    property_type_selectors: &[".farmland__type"],
    date_selectors: &["div.date", "span.post-date", "span.date-display-single", ".field-name-post-date"],
    date_labels: &["Date posted", "Listing date"],
    default_property_type: PropertyType::Farm,
    refine_name,
    location_hints,
    additional_data,
};

/// Acreage breakdown labels and the name each is reported under.
const ACREAGE_BREAKDOWN: &[(&str, &[&str])] = &[
    ("Cropland", &["Acres of cropland"]),
    ("Pasture", &["Acres of pasture"]),
    ("Forest", &["Acres of forested land", "Acres of forest"]),
];

const FARM_BLOCKS: &[(&str, &[&str])] = &[
    ("Infrastructure", &["Farm infrastructure details", "Farm infrastructure"]),
    ("Water Sources", &["Water sources details", "Water sources"]),
    ("Equipment", &["Equipment and machinery details", "Equipment and machinery"]),
];

const HOUSING_LABELS: &[&str] = &["Farmer housing details", "Farmer housing", "Housing"];

const FEATURE_BLOCKS: &[(&str, &[&str])] = &[
    ("Organic Status", &["Certified organic", "Is the property certified organic?"]),
    ("Conservation Easement", &["Conservation easement", "Conservation easement details"]),
    ("Forest Management", &["Forest management plan"]),
];

/// Farm names carry the town and site name after a bullet, bar, dash or comma.
fn refine_name(raw: &str) -> String {
    cut_at(raw, &["•", "|", " - ", ","])
}

/// Whatever follows the farm name in the heading, e.g. `"Sunny Acres • Unity, ME"`.
fn location_hints(doc: &Document) -> Vec<String> {
    let mut hints = Vec::new();
    for heading in [doc.select_text("h1"), doc.title()].into_iter().flatten() {
        if let Some((_, rest)) = heading.split_once('•') {
            hints.push(rest.trim().to_string());
        }
    }
    hints
}

fn additional_data(doc: &Document, description: Option<&str>) -> AdditionalData {
    let mut raw = Map::new();

    let breakdown: Vec<String> = ACREAGE_BREAKDOWN
        .iter()
        .filter_map(|(name, labels)| {
            let value = doc.first_label_value(labels)?;
            match parse_acres(&value) {
                Ok(acres) => Some(format!("{name}: {acres} acres")),
                Err(e) => {
                    tracing::debug!(field = name, error = %e, "Skipping acreage breakdown value");
                    None
                }
            }
        })
        .collect();
    insert_text(&mut raw, "acreage_details", join_details(breakdown.clone()));

    let mut blocks = Vec::new();
    for (name, labels) in FARM_BLOCKS {
        if let Some(value) = doc.first_label_value(labels) {
            raw.insert(name.to_lowercase().replace(' ', "_"), Value::String(value.clone()));
            blocks.push(format!("{name}: {value}"));
        }
    }

    let features: Vec<String> = FEATURE_BLOCKS
        .iter()
        .filter_map(|(name, labels)| doc.first_label_value(labels).map(|v| format!("{name}: {v}")))
        .collect();
    insert_text(&mut raw, "property_features", join_details(features));
    insert_text(&mut raw, "owner_type", doc.label_value("Property owner"));

    let farm_details = join_details(breakdown.into_iter().chain(blocks).collect())
        .or_else(|| description.and_then(text::farm_details));

    AdditionalData { house_details: doc.first_label_value(HOUSING_LABELS), farm_details, raw }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><head><title>Sunny Acres Farm • Unity, ME | Maine FarmLink</title></head><body>
        <h1 class="farmland__title">Sunny Acres Farm • Unity, ME</h1>
        <div class="field"><div class="label">Total number of acres</div><div class="value">62</div></div>
        <div class="field"><div class="label">Acres of cropland</div><div class="value">20</div></div>
        <div class="field"><div class="label">Acres of pasture</div><div class="value">Not specified</div></div>
        <div class="field"><div class="label">Acres of forested land</div><div class="value">35.5</div></div>
        <div class="field"><div class="label">Farm infrastructure details</div><div class="value">Dairy barn and two hoop houses</div></div>
        <div class="field"><div class="label">Water sources details</div><div class="value">Drilled well, year-round stream</div></div>
        <div class="field"><div class="label">Farmer housing details</div><div class="value">3 bedroom farmhouse</div></div>
        <div class="field"><div class="label">Property owner</div><div class="value">Private individual</div></div>
    </body></html>"#;

    #[test]
    fn test_refine_name() {
        assert_eq!(refine_name("Sunny Acres Farm • Unity, ME"), "Sunny Acres Farm");
        assert_eq!(refine_name("Hilltop Orchard | New England Farmland Finder"), "Hilltop Orchard");
        assert_eq!(refine_name("Bragg-Smith Farm - Westbrook"), "Bragg-Smith Farm");
        assert_eq!(refine_name("Old Mill Farm, Hardwick"), "Old Mill Farm");
    }

    #[test]
    fn test_location_hints_from_heading() {
        let doc = Document::parse(LISTING).unwrap();
        let hints = location_hints(&doc);
        assert_eq!(hints[0], "Unity, ME");
    }

    #[test]
    fn test_additional_data_breakdown() {
        let doc = Document::parse(LISTING).unwrap();
        let data = additional_data(&doc, None);
        let farm_details = data.farm_details.unwrap();
        assert!(farm_details.starts_with("Cropland: 20 acres | Forest: 35.5 acres"), "{farm_details}");
        assert!(farm_details.contains("Infrastructure: Dairy barn and two hoop houses"));
        assert!(!farm_details.contains("Pasture"));
        assert_eq!(data.house_details.as_deref(), Some("3 bedroom farmhouse"));
        assert_eq!(data.raw["water_sources"], "Drilled well, year-round stream");
        assert_eq!(data.raw["owner_type"], "Private individual");
    }

    #[test]
    fn test_additional_data_falls_back_to_description() {
        let doc = Document::parse("<html><body><h1>Small Farm</h1></body></html>").unwrap();
        let data = additional_data(&doc, Some("Includes a post and beam barn and fenced pasture for grazing."));
        assert!(data.farm_details.unwrap().contains("barn"));
        assert!(data.house_details.is_none());
        assert!(data.raw.is_empty());
    }
}
