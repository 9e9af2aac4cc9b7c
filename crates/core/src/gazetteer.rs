//! Known New England towns and distance reference points.
//!
//! The gazetteer is immutable once built. It is constructed at startup, either
//! from the built-in table or from a TOML file, and shared by reference.

use std::path::Path;

use figment::{
    Figment,
    providers::{Format, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Town {
    pub name: String,
    /// Two-letter postal code.
    pub state: String,
    pub lat: f64,
    pub lon: f64,
}

impl Town {
    /// `"Town, ST"`.
    pub fn display(&self) -> String {
        format!("{}, {}", self.name, self.state)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// A fixed point listings are measured against, e.g. `"Portland, ME"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl ReferencePoint {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Full New England state names and their postal codes.
pub const NEW_ENGLAND_STATES: &[(&str, &str)] = &[
    ("maine", "ME"),
    ("new hampshire", "NH"),
    ("vermont", "VT"),
    ("massachusetts", "MA"),
    ("connecticut", "CT"),
    ("rhode island", "RI"),
];

/// Every US postal state code, for validating `"Town, ST"` matches.
pub const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS", "KY", "LA",
    "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Postal code for a full New England state name, case-insensitive.
pub fn state_code(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    NEW_ENGLAND_STATES.iter().find(|(full, _)| *full == name).map(|(_, code)| *code)
}

pub fn is_state_code(code: &str) -> bool {
    US_STATE_CODES.contains(&code)
}

/// Ordered town table plus reference points.
///
/// Town order matters: when a name appears more than once, lookups return the
/// first entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gazetteer {
    pub towns: Vec<Town>,
    pub reference_points: Vec<ReferencePoint>,
}

const BUILTIN_TOWNS: &[(&str, &str, f64, f64)] = &[
    ("Portland", "ME", 43.6591, -70.2568),
    ("South Portland", "ME", 43.6415, -70.2409),
    ("Augusta", "ME", 44.3107, -69.7795),
    ("Bangor", "ME", 44.8012, -68.7778),
    ("Brunswick", "ME", 43.9145, -69.9653),
    ("Bath", "ME", 43.9109, -69.8206),
    ("Freeport", "ME", 43.8570, -70.1031),
    ("Camden", "ME", 44.2098, -69.0648),
    ("Rockland", "ME", 44.1037, -69.1089),
    ("Waldoboro", "ME", 44.0953, -69.3756),
    ("Damariscotta", "ME", 44.0328, -69.5186),
    ("Belfast", "ME", 44.4259, -69.0064),
    ("Unity", "ME", 44.6084, -69.3334),
    ("Kittery", "ME", 43.0884, -70.7364),
    ("York", "ME", 43.1617, -70.6481),
    ("Biddeford", "ME", 43.4926, -70.4534),
    ("Saco", "ME", 43.5009, -70.4428),
    ("Scarborough", "ME", 43.5781, -70.3217),
    ("Gorham", "ME", 43.6795, -70.4442),
    ("Lewiston", "ME", 44.1004, -70.2148),
    ("Auburn", "ME", 44.0979, -70.2312),
    ("Waterville", "ME", 44.5520, -69.6317),
    ("Skowhegan", "ME", 44.7651, -69.7193),
    ("Farmington", "ME", 44.6706, -70.1512),
    ("Ellsworth", "ME", 44.5434, -68.4195),
    ("Bar Harbor", "ME", 44.3876, -68.2039),
    ("Presque Isle", "ME", 46.6812, -68.0159),
    ("Concord", "NH", 43.2081, -71.5376),
    ("Manchester", "NH", 42.9956, -71.4548),
    ("Portsmouth", "NH", 43.0718, -70.7626),
    ("Keene", "NH", 42.9337, -72.2781),
    ("Hanover", "NH", 43.7022, -72.2896),
    ("Conway", "NH", 43.9792, -71.1203),
    ("Burlington", "VT", 44.4759, -73.2121),
    ("Montpelier", "VT", 44.2601, -72.5754),
    ("Rutland", "VT", 43.6106, -72.9726),
    ("Brattleboro", "VT", 42.8509, -72.5579),
    ("Middlebury", "VT", 44.0153, -73.1673),
    ("Stowe", "VT", 44.4654, -72.6874),
    ("Boston", "MA", 42.3601, -71.0589),
    ("Worcester", "MA", 42.2626, -71.8023),
    ("Springfield", "MA", 42.1015, -72.5898),
    ("Amherst", "MA", 42.3732, -72.5199),
    ("Northampton", "MA", 42.3251, -72.6412),
    ("Pittsfield", "MA", 42.4501, -73.2454),
    ("Hartford", "CT", 41.7658, -72.6734),
    ("New Haven", "CT", 41.3083, -72.9279),
    ("Litchfield", "CT", 41.7473, -73.1887),
    ("Providence", "RI", 41.8240, -71.4128),
    ("Newport", "RI", 41.4901, -71.3128),
];

const BUILTIN_REFERENCE_POINTS: &[(&str, f64, f64)] = &[
    ("Portland, ME", 43.6591, -70.2568),
    ("Augusta, ME", 44.3107, -69.7795),
    ("Burlington, VT", 44.4759, -73.2121),
];

impl Gazetteer {
    /// Built-in table of New England towns and the three regional reference cities.
    pub fn new_england() -> Self {
        let towns = BUILTIN_TOWNS
            .iter()
            .map(|&(name, state, lat, lon)| Town { name: name.to_string(), state: state.to_string(), lat, lon })
            .collect();
        let reference_points = BUILTIN_REFERENCE_POINTS
            .iter()
            .map(|&(name, lat, lon)| ReferencePoint { name: name.to_string(), lat, lon })
            .collect();
        Self { towns, reference_points }
    }

    /// Load a gazetteer from a TOML file with `[[towns]]` and `[[reference_points]]` tables.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gazetteer` if the file cannot be read or parsed, or if
    /// the loaded data fails [`Gazetteer::validate`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let gazetteer: Self = Figment::from(Toml::file_exact(path))
            .extract()
            .map_err(|e| Error::Gazetteer(format!("{}: {}", path.display(), e)))?;
        gazetteer.validate()?;
        tracing::debug!(
            towns = gazetteer.towns.len(),
            reference_points = gazetteer.reference_points.len(),
            "Loaded gazetteer from {}",
            path.display()
        );
        Ok(gazetteer)
    }

    /// Check that the table is usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gazetteer` if there are no towns or reference points,
    /// a state code is not a US postal code, or a coordinate is out of range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.towns.is_empty() {
            return Err(Error::Gazetteer("no towns defined".into()));
        }
        if self.reference_points.is_empty() {
            return Err(Error::Gazetteer("no reference points defined".into()));
        }
        for town in &self.towns {
            if town.name.trim().is_empty() {
                return Err(Error::Gazetteer("town with empty name".into()));
            }
            if !is_state_code(&town.state) {
                return Err(Error::Gazetteer(format!("{}: unknown state code {:?}", town.name, town.state)));
            }
            if !valid_coordinates(town.lat, town.lon) {
                return Err(Error::Gazetteer(format!("{}: coordinates out of range", town.name)));
            }
        }
        for point in &self.reference_points {
            if !valid_coordinates(point.lat, point.lon) {
                return Err(Error::Gazetteer(format!("{}: coordinates out of range", point.name)));
            }
        }
        Ok(())
    }

    /// Exact town lookup, case-insensitive on the name.
    pub fn town(&self, name: &str, state: &str) -> Option<&Town> {
        self.towns.iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()) && t.state == state)
    }

    /// Known town mentioned anywhere in `text`.
    ///
    /// Names must match on word boundaries and as written in the table (or
    /// all caps), so "1 bath" in prose never names Bath. The longest matching
    /// name wins, so "South Portland" beats "Portland"; ties go to the
    /// earlier entry.
    pub fn find_town(&self, text: &str) -> Option<&Town> {
        let mut best: Option<&Town> = None;
        for town in &self.towns {
            if !contains_word(text, &town.name) && !contains_word(text, &town.name.to_uppercase()) {
                continue;
            }
            if best.is_none_or(|b| town.name.len() > b.name.len()) {
                best = Some(town);
            }
        }
        best
    }

    pub fn reference_point(&self, name: &str) -> Option<&ReferencePoint> {
        self.reference_points.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Reference point named by configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gazetteer` when the gazetteer has no such point.
    pub fn require_reference_point(&self, name: &str) -> Result<&ReferencePoint, Error> {
        self.reference_point(name)
            .ok_or_else(|| Error::Gazetteer(format!("unknown reference point {name:?}")))
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new_england()
    }
}

fn valid_coordinates(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
