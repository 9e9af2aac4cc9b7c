//! Stateless text normalization shared by every source.
//!
//! Numeric and bucketing decisions for price and acreage are made here and
//! nowhere else.

pub mod acreage;
pub mod clean;
pub mod dates;
pub mod details;
pub mod error;
pub mod price;
pub mod property_type;

pub use acreage::{acreage_from_lot_text, acreage_from_square_feet, extract_acreage, find_acreage, parse_acres};
pub use clean::{clean_html, collapse_whitespace, summarize, text_after_label};
pub use dates::{extract_listing_date, parse_date_string};
pub use details::{extract_bed_bath, farm_details, house_details, land_features};
pub use error::NormalizeError;
pub use price::clean_price;
pub use property_type::extract_property_type;
