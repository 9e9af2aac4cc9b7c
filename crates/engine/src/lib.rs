//! Extraction and normalization engine for New England property listings.
//!
//! This crate provides the text normalization utilities, the location
//! resolver and geocoders, and the shared extraction pipeline with its
//! per-source profiles.

pub mod document;
pub mod extract;
pub mod listing_url;
pub mod location;
pub mod text;

pub use document::Document;
pub use extract::{Diagnostic, ExtractContext, Extraction, SourceProfile, extract_listing};
pub use listing_url::ListingUrl;
pub use location::{DistanceReport, GeocodeError, Geocoder, LocationResolver, geocoder_for};
pub use text::NormalizeError;
