//! The normalized listing record and its enumerations.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::buckets::{self, CONTACT_FOR_PRICE, NOT_SPECIFIED, UNKNOWN_DISTANCE};

/// Default listing name when no title can be found.
pub const UNTITLED_LISTING: &str = "Untitled Listing";

/// Default location when neither a "Town, ST" pattern nor a known town is found.
pub const LOCATION_UNKNOWN: &str = "Location Unknown";

/// Listing website a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Platform {
    #[serde(rename = "Maine Farmland Trust")]
    MaineFarmlandTrust,
    #[serde(rename = "New England Farmland Finder")]
    NewEnglandFarmlandFinder,
    #[serde(rename = "Land and Farm")]
    LandAndFarm,
    #[serde(rename = "Realtor.com")]
    Realtor,
}

impl Platform {
    pub const ALL: [Platform; 4] =
        [Platform::MaineFarmlandTrust, Platform::NewEnglandFarmlandFinder, Platform::LandAndFarm, Platform::Realtor];

    /// Display name written to the record's `platform` key.
    pub fn name(self) -> &'static str {
        match self {
            Platform::MaineFarmlandTrust => "Maine Farmland Trust",
            Platform::NewEnglandFarmlandFinder => "New England Farmland Finder",
            Platform::LandAndFarm => "Land and Farm",
            Platform::Realtor => "Realtor.com",
        }
    }

    /// Registrable domain the platform serves listings from.
    pub fn domain(self) -> &'static str {
        match self {
            Platform::MaineFarmlandTrust => "mainefarmlandtrust.org",
            Platform::NewEnglandFarmlandFinder => "newenglandfarmlandfinder.org",
            Platform::LandAndFarm => "landandfarm.com",
            Platform::Realtor => "realtor.com",
        }
    }

    /// Platform for a URL host, matching the domain or any subdomain of it.
    pub fn from_host(host: &str) -> Option<Self> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| {
            let domain = p.domain();
            host == domain || host.strip_suffix(domain).is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Property category, detected from listing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum PropertyType {
    #[serde(rename = "Single Family")]
    SingleFamily,
    #[serde(rename = "Multi Family")]
    MultiFamily,
    Farm,
    Land,
    Commercial,
    #[default]
    Unknown,
}

impl PropertyType {
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "Single Family",
            PropertyType::MultiFamily => "Multi Family",
            PropertyType::Farm => "Farm",
            PropertyType::Land => "Land",
            PropertyType::Commercial => "Commercial",
            PropertyType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One normalized listing.
///
/// Every key is always serialized. Free-text details serialize as `null`
/// when absent; every other field carries a sentinel instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListingRecord {
    pub listing_name: String,
    pub url: String,
    pub platform: Platform,
    /// `$N,NNN`, `$N.NM`, or `"Contact for Price"`.
    pub price: String,
    pub price_bucket: String,
    /// `"N.N acres"` or `"Not specified"`.
    pub acreage: String,
    pub acreage_bucket: String,
    /// `"Town, ST"` or `"Location Unknown"`.
    pub location: String,
    pub distance_bucket: String,
    pub property_type: PropertyType,
    pub house_details: Option<String>,
    pub farm_details: Option<String>,
    /// Short description of the listing.
    pub notes: Option<String>,
    /// ISO-8601 calendar date.
    pub listing_date: String,
    pub raw_data: serde_json::Value,
}

impl ListingRecord {
    /// A record holding every default sentinel, dated `listing_date`.
    pub fn with_defaults(url: impl Into<String>, platform: Platform, listing_date: impl Into<String>) -> Self {
        Self {
            listing_name: UNTITLED_LISTING.to_string(),
            url: url.into(),
            platform,
            price: CONTACT_FOR_PRICE.to_string(),
            price_bucket: CONTACT_FOR_PRICE.to_string(),
            acreage: NOT_SPECIFIED.to_string(),
            acreage_bucket: NOT_SPECIFIED.to_string(),
            location: LOCATION_UNKNOWN.to_string(),
            distance_bucket: UNKNOWN_DISTANCE.to_string(),
            property_type: PropertyType::Unknown,
            house_details: None,
            farm_details: None,
            notes: None,
            listing_date: listing_date.into(),
            raw_data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Whether both bucket fields are what their values map to.
    pub fn buckets_consistent(&self) -> bool {
        buckets::price_pair_consistent(&self.price, &self.price_bucket)
            && buckets::acreage_pair_consistent(&self.acreage, &self.acreage_bucket)
    }
}
