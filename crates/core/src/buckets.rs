//! Fixed band tables for price, acreage and distance.
//!
//! Every bucket label downstream consumers see comes from these tables. The
//! labels are part of the output contract and must not be reworded.

/// Sentinel used for both `price` and `price_bucket` when no price is listed.
pub const CONTACT_FOR_PRICE: &str = "Contact for Price";

/// Sentinel used for both `acreage` and `acreage_bucket` when no acreage is found.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Distance bucket when coordinates are unavailable.
pub const UNKNOWN_DISTANCE: &str = "Unknown";

/// One band of an ascending table. `upper` is `None` for the open-ended last band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub label: &'static str,
    pub upper: Option<f64>,
}

const fn band(label: &'static str, upper: f64) -> Band {
    Band { label, upper: Some(upper) }
}

const fn open(label: &'static str) -> Band {
    Band { label, upper: None }
}

/// Price bands in dollars. Upper bounds are exclusive.
pub const PRICE_BANDS: &[Band] = &[
    band("Under $300K", 300_000.0),
    band("$300K - $600K", 600_000.0),
    band("$600K - $900K", 900_000.0),
    band("$900K - $1.2M", 1_200_000.0),
    band("$1.2M - $1.5M", 1_500_000.0),
    band("$1.5M - $2M", 2_000_000.0),
    open("$2M+"),
];

/// Acreage bands in acres. Upper bounds are exclusive.
pub const ACREAGE_BANDS: &[Band] = &[
    band("Tiny (Under 1 acre)", 1.0),
    band("Small (1-5 acres)", 5.0),
    band("Medium (5-20 acres)", 20.0),
    band("Large (20-50 acres)", 50.0),
    band("Very Large (50-100 acres)", 100.0),
    open("Extensive (100+ acres)"),
];

/// Distance bands in whole miles. Upper bounds are inclusive.
pub const DISTANCE_BANDS: &[Band] = &[
    band("0-10", 10.0),
    band("11-20", 20.0),
    band("21-40", 40.0),
    band("41-60", 60.0),
    band("61-80", 80.0),
    open("81+"),
];

fn classify_exclusive(bands: &'static [Band], value: f64) -> &'static str {
    bands
        .iter()
        .find(|b| b.upper.is_none_or(|upper| value < upper))
        .map_or(NOT_SPECIFIED, |b| b.label)
}

/// Bucket for a dollar amount.
pub fn price_bucket(dollars: f64) -> &'static str {
    classify_exclusive(PRICE_BANDS, dollars)
}

/// Bucket for an acreage.
pub fn acreage_bucket(acres: f64) -> &'static str {
    classify_exclusive(ACREAGE_BANDS, acres)
}

/// Bucket for a distance in miles, or `"Unknown"` when there is none.
///
/// Miles are rounded to the nearest whole mile before classification, so
/// 10.4 miles is `"0-10"` and 10.6 miles is `"11-20"`.
pub fn distance_bucket(miles: Option<f64>) -> &'static str {
    let Some(miles) = miles.filter(|m| m.is_finite() && *m >= 0.0) else {
        return UNKNOWN_DISTANCE;
    };
    let miles = miles.round();
    DISTANCE_BANDS
        .iter()
        .find(|b| b.upper.is_none_or(|upper| miles <= upper))
        .map_or(UNKNOWN_DISTANCE, |b| b.label)
}

/// Dollar value of a rendered price (`"$450,000"` or `"$1.5M"`).
///
/// Returns `None` for the contact sentinel or anything not in rendered form.
pub fn rendered_price_value(rendered: &str) -> Option<f64> {
    let body = rendered.strip_prefix('$')?;
    if let Some(millions) = body.strip_suffix('M') {
        // Whole tenths of a million, so "$1.2M" lands exactly on 1_200_000.
        return millions.parse::<f64>().ok().map(|m| (m * 10.0).round() * 100_000.0);
    }
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == ',') {
        return None;
    }
    body.replace(',', "").parse::<f64>().ok()
}

/// Acres of a rendered acreage (`"12.5 acres"`).
pub fn rendered_acreage_value(rendered: &str) -> Option<f64> {
    rendered.strip_suffix(" acres")?.parse::<f64>().ok()
}

/// Whether `bucket` is the one `price` maps to.
pub fn price_pair_consistent(price: &str, bucket: &str) -> bool {
    if price == CONTACT_FOR_PRICE {
        return bucket == CONTACT_FOR_PRICE;
    }
    rendered_price_value(price).is_some_and(|v| price_bucket(v) == bucket)
}

/// Whether `bucket` is the one `acreage` maps to.
pub fn acreage_pair_consistent(acreage: &str, bucket: &str) -> bool {
    if acreage == NOT_SPECIFIED {
        return bucket == NOT_SPECIFIED;
    }
    rendered_acreage_value(acreage).is_some_and(|v| acreage_bucket(v) == bucket)
}
