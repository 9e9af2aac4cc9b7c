//! Core types and shared data for the listings engine.
//!
//! This crate provides:
//! - The normalized `ListingRecord` and its enumerations
//! - Price, acreage and distance band tables
//! - The New England gazetteer
//! - Unified error types and layered configuration

pub mod buckets;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod gazetteer;
pub mod record;

pub use config::{AppConfig, ConfigError, GeocoderKind};
pub use error::Error;
pub use fingerprint::document_fingerprint;
pub use gazetteer::{Coordinates, Gazetteer, ReferencePoint, Town};
pub use record::{ListingRecord, Platform, PropertyType};
