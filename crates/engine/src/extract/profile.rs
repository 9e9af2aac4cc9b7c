//! Per-source extraction rules.
//!
//! Each platform maps to one static `SourceProfile`: the selectors and label
//! strings that locate its fields, plus the few hooks where a source needs
//! its own logic. The pipeline itself is shared.

use listings_core::{Platform, PropertyType};
use serde_json::{Map, Value};

use crate::document::Document;

use super::sources;

/// Description containers most listing pages use.
pub const BASE_DESCRIPTION_SELECTORS: &[&str] = &[
    ".property-description",
    ".description",
    ".listing-description",
    ".details",
    "#property-description",
    "#description",
];

/// Descriptions shorter than this are labels or placeholders.
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Output of a source's extension step.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AdditionalData {
    pub house_details: Option<String>,
    pub farm_details: Option<String>,
    /// Extra values merged into the record's `raw_data`.
    pub raw: Map<String, Value>,
}

pub struct SourceProfile {
    /// Short identifier written to `raw_data.extraction_source`.
    pub id: &'static str,
    pub name_selectors: &'static [&'static str],
    pub price_selectors: &'static [&'static str],
    pub price_labels: &'static [&'static str],
    pub acreage_selectors: &'static [&'static str],
    pub acreage_labels: &'static [&'static str],
    pub location_selectors: &'static [&'static str],
    pub location_labels: &'static [&'static str],
    /// Tried before [`BASE_DESCRIPTION_SELECTORS`].
    pub description_selectors: &'static [&'static str],
    pub property_type_selectors: &'static [&'static str],
    pub date_selectors: &'static [&'static str],
    /// Added to the shared date labels.
    pub date_labels: &'static [&'static str],
    /// Used when no property type indicator is found.
    pub default_property_type: PropertyType,
    /// Turns a raw heading or page title into a listing name.
    pub refine_name: fn(&str) -> String,
    /// Location text only this source exposes.
    pub location_hints: fn(&Document) -> Vec<String>,
    pub additional_data: fn(&Document, Option<&str>) -> AdditionalData,
}

impl SourceProfile {
    pub fn for_platform(platform: Platform) -> &'static SourceProfile {
        match platform {
            Platform::MaineFarmlandTrust | Platform::NewEnglandFarmlandFinder => &sources::farmland::PROFILE,
            Platform::LandAndFarm => &sources::landandfarm::PROFILE,
            Platform::Realtor => &sources::realtor::PROFILE,
        }
    }

    /// Listing description: source containers first, then the shared ones.
    pub fn description(&self, doc: &Document) -> Option<String> {
        self.description_selectors
            .iter()
            .chain(BASE_DESCRIPTION_SELECTORS)
            .filter_map(|css| doc.select_text(css))
            .find(|text| text.chars().count() >= MIN_DESCRIPTION_LEN)
    }
}

impl std::fmt::Debug for SourceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceProfile").field("id", &self.id).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_platform() {
        assert_eq!(SourceProfile::for_platform(Platform::MaineFarmlandTrust).id, "farmland");
        assert_eq!(SourceProfile::for_platform(Platform::NewEnglandFarmlandFinder).id, "farmland");
        assert_eq!(SourceProfile::for_platform(Platform::LandAndFarm).id, "landandfarm");
        assert_eq!(SourceProfile::for_platform(Platform::Realtor).id, "realtor");
    }

    #[test]
    fn test_default_property_types() {
        assert_eq!(SourceProfile::for_platform(Platform::MaineFarmlandTrust).default_property_type, PropertyType::Farm);
        assert_eq!(SourceProfile::for_platform(Platform::LandAndFarm).default_property_type, PropertyType::Land);
        assert_eq!(SourceProfile::for_platform(Platform::Realtor).default_property_type, PropertyType::SingleFamily);
    }

    #[test]
    fn test_description_skips_short_text() {
        let doc = Document::parse(
            r#"<html><body>
                <div class="description">Details</div>
                <div id="description">A working dairy farm with river frontage and a post-and-beam barn.</div>
            </body></html>"#,
        )
        .unwrap();
        let profile = SourceProfile::for_platform(Platform::LandAndFarm);
        let description = profile.description(&doc).unwrap();
        assert!(description.starts_with("A working dairy farm"));
    }
}
