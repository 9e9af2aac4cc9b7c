//! Acreage parsing, rendering and bucketing.

use std::sync::LazyLock;

use listings_core::buckets::{NOT_SPECIFIED, acreage_bucket};
use regex::Regex;

use super::error::NormalizeError;

pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;

/// A number followed by "acre(s)", tolerating qualifiers between them:
/// `45 acres`, `100+ acres`, `12 +/- acres`, `±3.5 acres`, `45-acre farm`, `1,200 acres`.
static ACRES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?|\.\d+)\s*(?:\+/-|±|\+|~)?\s*(?:-\s*)?acres?\b").expect("invalid regex")
});

static SQUARE_FEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(?:sq\.?\s*ft\.?|sqft|square\s+f(?:ee|oo)t)").expect("invalid regex")
});

/// Strict parse of a bare acreage token such as `"45"` or `"1,200.5"`.
///
/// Callers holding a label value must go through this before comparing
/// against band thresholds; words like "Not specified" are rejected here.
///
/// # Errors
///
/// Returns `NormalizeError::AcreageParse` if the token is not a finite,
/// non-negative number.
pub fn parse_acres(token: &str) -> Result<f64, NormalizeError> {
    let cleaned = token.trim().trim_end_matches('+').replace(',', "");
    let acres: f64 = cleaned.parse().map_err(|_| NormalizeError::AcreageParse(token.to_string()))?;
    if acres.is_finite() && acres >= 0.0 { Ok(acres) } else { Err(NormalizeError::AcreageParse(token.to_string())) }
}

/// First acreage mentioned in `text`, in acres.
pub fn find_acreage(text: &str) -> Option<f64> {
    ACRES.captures_iter(text).find_map(|c| parse_acres(&c[1]).ok())
}

/// Rendered acreage (`"N.N acres"`) and its bucket.
///
/// The bucket comes from the rounded value so the pair always agrees.
pub fn render_acreage(acres: f64) -> (String, String) {
    let rounded = (acres * 10.0).round() / 10.0;
    (format!("{rounded:.1} acres"), acreage_bucket(rounded).to_string())
}

/// Scan text for an acreage and bucket it.
///
/// No numeric acreage token gives `("Not specified", "Not specified")`.
pub fn extract_acreage(text: &str) -> (String, String) {
    match find_acreage(text) {
        Some(acres) => render_acreage(acres),
        None => (NOT_SPECIFIED.to_string(), NOT_SPECIFIED.to_string()),
    }
}

/// Acreage for a lot size given in square feet.
pub fn acreage_from_square_feet(square_feet: f64) -> Option<(String, String)> {
    (square_feet.is_finite() && square_feet > 0.0).then(|| render_acreage(square_feet / SQUARE_FEET_PER_ACRE))
}

/// Acreage from a lot-size string in either acres or square feet.
pub fn acreage_from_lot_text(text: &str) -> Option<(String, String)> {
    if let Some(acres) = find_acreage(text) {
        return Some(render_acreage(acres));
    }
    let captures = SQUARE_FEET.captures(text)?;
    let square_feet: f64 = captures[1].replace(',', "").parse().ok()?;
    acreage_from_square_feet(square_feet)
}
