//! Geocoding collaborators.
//!
//! A geocoder turns a `"Town, ST"` string into coordinates. Failures are
//! reported as `GeocodeError` and the resolver degrades them to an unknown
//! distance; nothing here is fatal to extraction.

use listings_core::{AppConfig, Coordinates, Gazetteer, GeocoderKind};
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding timed out: {0}")]
    Timeout(String),

    #[error("geocoding request failed: {0}")]
    Network(String),

    #[error("geocoding service returned HTTP {0}")]
    Status(u16),

    #[error("unreadable geocoding response: {0}")]
    Parse(String),
}

/// Coordinates lookup for a location string.
///
/// `Ok(None)` means the service answered but does not know the place.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, location: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Offline geocoder backed by the gazetteer's town and reference coordinates.
pub struct GazetteerGeocoder<'a> {
    gazetteer: &'a Gazetteer,
}

impl<'a> GazetteerGeocoder<'a> {
    pub fn new(gazetteer: &'a Gazetteer) -> Self {
        Self { gazetteer }
    }
}

impl Geocoder for GazetteerGeocoder<'_> {
    fn geocode(&self, location: &str) -> Result<Option<Coordinates>, GeocodeError> {
        if let Some(point) = self.gazetteer.reference_point(location) {
            return Ok(Some(point.coordinates()));
        }
        let Some((town, state)) = location.rsplit_once(',') else {
            return Ok(None);
        };
        Ok(self.gazetteer.town(town.trim(), state.trim()).map(|t| t.coordinates()))
    }
}

/// Geocoder that never knows any place.
pub struct DisabledGeocoder;

impl Geocoder for DisabledGeocoder {
    fn geocode(&self, _location: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Nominatim-compatible search endpoint, one blocking request per lookup.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: Url,
}

impl NominatimGeocoder {
    /// Build a geocoder from the configured endpoint, timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError::Network` if the endpoint is not a valid URL or
    /// the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, GeocodeError> {
        let endpoint = Url::parse(&config.geocoder_url).map_err(|e| GeocodeError::Network(e.to_string()))?;
        let client = Client::builder()
            .timeout(config.geocode_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    /// Request URL for one lookup, restricted to the United States.
    pub fn search_url(&self, location: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", location)
            .append_pair("format", "json")
            .append_pair("limit", "1")
            .append_pair("countrycodes", "us");
        url
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, location: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.search_url(location);
        tracing::debug!(%url, "Geocoding {}", location);

        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() { GeocodeError::Timeout(e.to_string()) } else { GeocodeError::Network(e.to_string()) }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let places: Vec<NominatimPlace> = response.json().map_err(|e| GeocodeError::Parse(e.to_string()))?;
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let lat = place.lat.parse().map_err(|_| GeocodeError::Parse(format!("latitude {:?}", place.lat)))?;
        let lon = place.lon.parse().map_err(|_| GeocodeError::Parse(format!("longitude {:?}", place.lon)))?;
        Ok(Some(Coordinates::new(lat, lon)))
    }
}

/// Geocoder selected by configuration.
///
/// # Errors
///
/// Returns `GeocodeError` if the Nominatim client cannot be built.
pub fn geocoder_for<'a>(config: &AppConfig, gazetteer: &'a Gazetteer) -> Result<Box<dyn Geocoder + 'a>, GeocodeError> {
    Ok(match config.geocoder {
        GeocoderKind::Gazetteer => Box::new(GazetteerGeocoder::new(gazetteer)),
        GeocoderKind::Nominatim => Box::new(NominatimGeocoder::new(config)?),
        GeocoderKind::Disabled => Box::new(DisabledGeocoder),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gazetteer_geocoder_known_town() {
        let gazetteer = Gazetteer::new_england();
        let geocoder = GazetteerGeocoder::new(&gazetteer);
        let coords = geocoder.geocode("Brunswick, ME").unwrap().unwrap();
        assert!((coords.lat - 43.9145).abs() < 1e-6);
    }

    #[test]
    fn test_gazetteer_geocoder_reference_point() {
        let gazetteer = Gazetteer::new_england();
        let geocoder = GazetteerGeocoder::new(&gazetteer);
        assert!(geocoder.geocode("Burlington, VT").unwrap().is_some());
    }

    #[test]
    fn test_gazetteer_geocoder_unknown() {
        let gazetteer = Gazetteer::new_england();
        let geocoder = GazetteerGeocoder::new(&gazetteer);
        assert_eq!(geocoder.geocode("Springfield, IL").unwrap(), None);
        assert_eq!(geocoder.geocode("Location Unknown").unwrap(), None);
    }

    #[test]
    fn test_disabled_geocoder() {
        assert_eq!(DisabledGeocoder.geocode("Portland, ME").unwrap(), None);
    }

    #[test]
    fn test_nominatim_search_url() {
        let geocoder = NominatimGeocoder::new(&AppConfig::default()).unwrap();
        let url = geocoder.search_url("Camden, ME");
        assert_eq!(url.host_str(), Some("nominatim.openstreetmap.org"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "Camden, ME".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "1".to_string())));
    }

    #[test]
    fn test_nominatim_rejects_bad_endpoint() {
        let config = AppConfig { geocoder_url: "not a url".into(), ..Default::default() };
        assert!(matches!(NominatimGeocoder::new(&config), Err(GeocodeError::Network(_))));
    }

    #[test]
    fn test_geocoder_for_config() {
        let gazetteer = Gazetteer::new_england();
        let config = AppConfig { geocoder: GeocoderKind::Disabled, ..Default::default() };
        let geocoder = geocoder_for(&config, &gazetteer).unwrap();
        assert_eq!(geocoder.geocode("Portland, ME").unwrap(), None);
    }
}
