//! Listing extraction.
//!
//! [`extract_listing`] turns one already-fetched page into one
//! [`ListingRecord`]. Missing or malformed fields are defaulted and reported
//! as [`Diagnostic`]s; only a bad URL, an unsupported host or an unparseable
//! document abort the call.

pub mod field;
mod pipeline;
pub mod profile;
pub mod sources;

use chrono::NaiveDate;
use listings_core::{Error, ListingRecord};

pub use field::{Diagnostic, Field};
pub use profile::{AdditionalData, SourceProfile};

use crate::document::Document;
use crate::listing_url::ListingUrl;
use crate::location::LocationResolver;
use pipeline::Pipeline;

/// Shared, read-only inputs for any number of extractions.
pub struct ExtractContext<'a> {
    pub resolver: LocationResolver<'a>,
    /// Date used for relative phrases and the listing date fallback.
    pub today: NaiveDate,
}

impl<'a> ExtractContext<'a> {
    pub fn new(resolver: LocationResolver<'a>, today: NaiveDate) -> Self {
        Self { resolver, today }
    }
}

/// A record plus every default the pipeline had to write.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: ListingRecord,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extract a normalized record from `html` served at `url`.
///
/// # Errors
///
/// Returns `Error::InvalidUrl` or `Error::UnsupportedSource` when `url` does
/// not belong to a known platform, and `Error::UnparseableDocument` when
/// `html` is empty or binary. No partial record is returned in those cases.
pub fn extract_listing(ctx: &ExtractContext<'_>, url: &str, html: &str) -> Result<Extraction, Error> {
    let (listing_url, doc) = match ListingUrl::parse(url).and_then(|u| Document::parse(html).map(|d| (u, d))) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!(url, code = e.code(), "Extraction aborted: {}", e);
            return Err(e);
        }
    };

    let platform = listing_url.platform();
    let profile = SourceProfile::for_platform(platform);
    tracing::info!(url = listing_url.as_str(), %platform, source = profile.id, "Extracting listing");

    let (record, diagnostics) = Pipeline::new(profile, &doc, &listing_url, &ctx.resolver, ctx.today).run(html);

    tracing::info!(
        url = listing_url.as_str(),
        name = %record.listing_name,
        defaults = diagnostics.len(),
        "Extracted listing"
    );
    Ok(Extraction { record, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use listings_core::{Coordinates, Gazetteer, Platform, PropertyType};

    use crate::location::{GazetteerGeocoder, GeocodeError, Geocoder};

    struct FailingGeocoder;

    impl Geocoder for FailingGeocoder {
        fn geocode(&self, _location: &str) -> Result<Option<Coordinates>, GeocodeError> {
            Err(GeocodeError::Network("connection refused".into()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn extract_with(geocoder: &dyn Geocoder, gazetteer: &Gazetteer, url: &str, html: &str) -> Result<Extraction, Error> {
        let reference = gazetteer.require_reference_point("Portland, ME").unwrap();
        let ctx = ExtractContext::new(LocationResolver::new(gazetteer, geocoder, reference), today());
        extract_listing(&ctx, url, html)
    }

    fn extract(url: &str, html: &str) -> Result<Extraction, Error> {
        let gazetteer = Gazetteer::new_england();
        let geocoder = GazetteerGeocoder::new(&gazetteer);
        extract_with(&geocoder, &gazetteer, url, html)
    }

    fn fields(extraction: &Extraction) -> Vec<&'static str> {
        extraction.diagnostics.iter().map(|d| d.field).collect()
    }

    const MFT_URL: &str = "https://farmlink.mainefarmlandtrust.org/individual-farm-listings/farm-id-3582";

    const MFT_PAGE: &str = r#"<html><head><title>Sunny Acres Farm • Brunswick, ME | Maine FarmLink</title></head><body>
        <h1 class="farmland__title">Sunny Acres Farm • Brunswick, ME</h1>
        <div class="date">Posted March 5, 2024</div>
        <div class="field"><div class="label">Price</div><div class="value">$425,000</div></div>
        <div class="field"><div class="label">Total number of acres</div><div class="value">62</div></div>
        <div class="field"><div class="label">Location</div><div class="value">Brunswick, Maine</div></div>
        <div class="field"><div class="label">Acres of cropland</div><div class="value">20</div></div>
        <div class="farmland__description">Diversified vegetable farm with a dairy barn, greenhouse and irrigation.</div>
    </body></html>"#;

    #[test]
    fn test_extract_farmland_listing() {
        let extraction = extract(MFT_URL, MFT_PAGE).unwrap();
        let record = &extraction.record;

        assert_eq!(record.listing_name, "Sunny Acres Farm");
        assert_eq!(record.platform, Platform::MaineFarmlandTrust);
        assert_eq!(record.price, "$425,000");
        assert_eq!(record.price_bucket, "$300K - $600K");
        assert_eq!(record.acreage, "62.0 acres");
        assert_eq!(record.acreage_bucket, "Very Large (50-100 acres)");
        assert_eq!(record.location, "Brunswick, ME");
        assert_eq!(record.distance_bucket, "21-40");
        assert_eq!(record.property_type, PropertyType::Farm);
        assert_eq!(record.listing_date, "2024-03-05");
        assert!(record.farm_details.as_deref().unwrap().starts_with("Cropland: 20 acres"));
        assert!(record.notes.as_deref().unwrap().starts_with("Diversified vegetable farm"));
        assert!(record.buckets_consistent());
        assert!(extraction.diagnostics.is_empty(), "{:?}", extraction.diagnostics);

        assert_eq!(record.raw_data["extraction_source"], "farmland");
        assert_eq!(record.raw_data["acreage_text"], "62");
        assert_eq!(record.raw_data["html_length"], MFT_PAGE.len());
        assert_eq!(record.raw_data["html_sha256"].as_str().unwrap().len(), 64);
        assert_eq!(record.raw_data["distance"]["nearest_city"], "Portland, ME");
    }

    const NEFF_URL: &str = "https://newenglandfarmlandfinder.org/property/hilltop-orchard-hardwick-vt";

    const NEFF_PAGE: &str = r#"<html><head><title>Hilltop Orchard - Hardwick | New England Farmland Finder</title></head><body>
        <h1 class="page-title">Hilltop Orchard - Hardwick</h1>
        <div class="field"><div class="label">Total number of acres</div><div class="value">Not specified</div></div>
        <div class="field"><div class="label">Property location</div><div class="value">Hardwick, VT</div></div>
        <p>Apple orchard with cold storage.</p>
    </body></html>"#;

    #[test]
    fn test_extract_farmland_not_specified_acreage() {
        let extraction = extract(NEFF_URL, NEFF_PAGE).unwrap();
        let record = &extraction.record;

        assert_eq!(record.platform, Platform::NewEnglandFarmlandFinder);
        assert_eq!(record.listing_name, "Hilltop Orchard");
        assert_eq!(record.acreage, "Not specified");
        assert_eq!(record.acreage_bucket, "Not specified");
        assert_eq!(record.price, "Contact for Price");
        assert_eq!(record.price_bucket, "Contact for Price");
        assert_eq!(record.location, "Hardwick, VT");
        assert_eq!(record.distance_bucket, "Unknown");
        assert_eq!(record.property_type, PropertyType::Farm);
        assert!(record.buckets_consistent());
    }

    #[test]
    fn test_missing_date_defaults_to_today_once() {
        let extraction = extract(NEFF_URL, NEFF_PAGE).unwrap();
        assert_eq!(extraction.record.listing_date, "2024-06-01");
        let fields = fields(&extraction);
        assert_eq!(fields.iter().filter(|f| **f == "listing_date").count(), 1);
        assert!(fields.contains(&"price"));
        assert!(fields.contains(&"acreage"));
        assert!(!fields.contains(&"location"));
        assert_eq!(extraction.record.raw_data["diagnostics"].as_array().unwrap().len(), fields.len());
    }

    const LAF_URL: &str = "https://www.landandfarm.com/property/45-acres-in-brunswick-maine/123456/";

    const LAF_PAGE: &str = r#"<html><head><title>45 Acres in Brunswick, ME | Brunswick, ME | Land and Farm</title></head><body>
        <h1 class="_2233487">45 Acres in Brunswick, ME</h1>
        <div class="cff3611">$189,000</div>
        <span class="date">Listed 3 days ago</span>
        <div class="_5ae12cd">Mostly wooded land with a pond and a year-round stream. Great building site.</div>
    </body></html>"#;

    #[test]
    fn test_extract_landandfarm_listing() {
        let extraction = extract(LAF_URL, LAF_PAGE).unwrap();
        let record = &extraction.record;

        assert_eq!(record.platform, Platform::LandAndFarm);
        assert_eq!(record.listing_name, "45 Acres in Brunswick, ME");
        assert_eq!(record.price, "$189,000");
        assert_eq!(record.price_bucket, "Under $300K");
        assert_eq!(record.acreage, "45.0 acres");
        assert_eq!(record.acreage_bucket, "Large (20-50 acres)");
        assert_eq!(record.location, "Brunswick, ME");
        assert_eq!(record.distance_bucket, "21-40");
        assert_eq!(record.property_type, PropertyType::Land);
        assert_eq!(record.listing_date, "2024-05-29");
        assert!(record.house_details.is_none());
        assert_eq!(record.raw_data["extraction_source"], "landandfarm");
        assert!(record.buckets_consistent());
        assert!(extraction.diagnostics.is_empty(), "{:?}", extraction.diagnostics);
    }

    fn landandfarm_page(heading: &str, description: &str) -> String {
        format!(
            r#"<html><body><h1 class="_2233487">{heading}</h1>
            <div class="cff3611">$79,000</div><span class="date">Listed 3 days ago</span>
            <div class="_5ae12cd">{description}</div></body></html>"#
        )
    }

    #[test]
    fn test_extract_location_from_description_only() {
        let description = "Wooded acreage on a quiet road in Unity, Maine with mountain views.";
        let html = landandfarm_page("Wooded Retreat", description);
        let extraction = extract("https://www.landandfarm.com/property/wooded-retreat/98765/", &html).unwrap();
        let record = &extraction.record;

        assert_eq!(record.location, "Unity, ME");
        assert_ne!(record.distance_bucket, "Unknown");
        assert_eq!(record.raw_data["location_text"], description);
        assert!(!fields(&extraction).contains(&"location"));
    }

    #[test]
    fn test_extract_description_without_town_stays_unknown() {
        let html = landandfarm_page("Rustic Camp", "Rustic camp with 2 bedrooms and 1 bath on a quiet wooded lot");
        let extraction = extract("https://www.landandfarm.com/property/rustic-camp/98765/", &html).unwrap();
        let record = &extraction.record;

        assert_eq!(record.location, "Location Unknown");
        assert_eq!(record.distance_bucket, "Unknown");
        assert!(fields(&extraction).contains(&"location"));
    }

    const REALTOR_URL: &str =
        "https://www.realtor.com/realestateandhomes-detail/123-Main-St_Portland_ME_04101_M12345-67890";

    const REALTOR_PAGE: &str = r#"<html><body>
        <h1 data-testid="address">123 Main St, Portland, ME 04101</h1>
        <div data-testid="city-state">Portland, ME 04101</div>
        <div data-testid="list-price">$589,000</div>
        <ul>
            <li data-testid="property-meta-beds"><span>3</span> bed</li>
            <li data-testid="property-meta-baths"><span>2</span> bath</li>
            <li data-testid="property-meta-sqft"><span>1,920</span> sqft</li>
            <li data-testid="property-meta-lot-size"><span>21,780</span> sqft lot</li>
        </ul>
        <div data-testid="property-type">Single Family</div>
        <div data-testid="listing-date">May 20, 2024</div>
    </body></html>"#;

    #[test]
    fn test_extract_realtor_listing() {
        let extraction = extract(REALTOR_URL, REALTOR_PAGE).unwrap();
        let record = &extraction.record;

        assert_eq!(record.platform, Platform::Realtor);
        assert_eq!(record.listing_name, "123 Main St, Portland, ME 04101");
        assert_eq!(record.price, "$589,000");
        assert_eq!(record.price_bucket, "$300K - $600K");
        assert_eq!(record.acreage, "0.5 acres");
        assert_eq!(record.acreage_bucket, "Tiny (Under 1 acre)");
        assert_eq!(record.location, "Portland, ME");
        assert_eq!(record.distance_bucket, "0-10");
        assert_eq!(record.property_type, PropertyType::SingleFamily);
        assert_eq!(record.house_details.as_deref(), Some("3 bed | 2 bath | 1,920 sq ft"));
        assert_eq!(record.listing_date, "2024-05-20");
        assert_eq!(record.raw_data["blocking_detected"], false);
        assert!(record.buckets_consistent());
        assert!(extraction.diagnostics.is_empty(), "{:?}", extraction.diagnostics);
    }

    #[test]
    fn test_extract_blocked_realtor_page_uses_url() {
        let html = r#"<html><head><title>Pardon Our Interruption</title>
            <meta name="url-extracted-location" content="Portland, ME"></head>
            <body><h1>Pardon Our Interruption</h1><p>Please complete the captcha to continue.</p></body></html>"#;
        let extraction = extract(REALTOR_URL, html).unwrap();
        let record = &extraction.record;

        assert_eq!(record.listing_name, "123 Main St");
        assert_eq!(record.location, "Portland, ME");
        assert_eq!(record.price, "Contact for Price");
        assert_eq!(record.acreage, "Not specified");
        assert_eq!(record.property_type, PropertyType::SingleFamily);
        assert_eq!(record.raw_data["blocking_detected"], true);
        assert!(fields(&extraction).contains(&"property_type"));
    }

    #[test]
    fn test_geocoder_failure_is_not_fatal() {
        let gazetteer = Gazetteer::new_england();
        let extraction = extract_with(&FailingGeocoder, &gazetteer, MFT_URL, MFT_PAGE).unwrap();
        assert_eq!(extraction.record.location, "Brunswick, ME");
        assert_eq!(extraction.record.distance_bucket, "Unknown");
        assert!(extraction.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_document_is_fatal() {
        let err = extract(MFT_URL, "  \n ").unwrap_err();
        assert!(matches!(err, Error::UnparseableDocument(_)));
    }

    #[test]
    fn test_unsupported_source_is_fatal() {
        let err = extract("https://www.zillow.com/homedetails/123", MFT_PAGE).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource(_)));
        let err = extract("http://", MFT_PAGE).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_malformed_price_defaults() {
        let html = r#"<html><body><h1 class="farmland__title">Ridge Farm</h1>
            <div class="farmland__price">Negotiable</div>
            <div class="field"><div class="label">Location</div><div class="value">Camden, ME</div></div>
            </body></html>"#;
        let extraction = extract(MFT_URL, html).unwrap();
        assert_eq!(extraction.record.price, "Contact for Price");
        let price = extraction.diagnostics.iter().find(|d| d.field == "price").unwrap();
        assert!(price.reason.starts_with("invalid price format"), "{}", price.reason);
    }
}
