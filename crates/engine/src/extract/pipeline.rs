//! The shared extraction pipeline.
//!
//! Steps run in a fixed order: name, price, acreage, location, property
//! type, date, additional data, then assembly. Every step yields a
//! [`Field`]; a default is written, warned about once and recorded as a
//! diagnostic. Source profiles only change where each step looks.

use std::sync::LazyLock;

use chrono::NaiveDate;
use listings_core::buckets::{CONTACT_FOR_PRICE, NOT_SPECIFIED};
use listings_core::record::{LOCATION_UNKNOWN, UNTITLED_LISTING};
use listings_core::{ListingRecord, PropertyType, document_fingerprint};
use regex::Regex;
use serde_json::{Map, Value};

use super::field::{Diagnostic, Field};
use super::profile::SourceProfile;
use crate::document::Document;
use crate::listing_url::ListingUrl;
use crate::location::LocationResolver;
use crate::text::acreage::render_acreage;
use crate::text::{
    acreage_from_lot_text, clean_price, extract_listing_date, extract_property_type, find_acreage, parse_acres,
    summarize,
};

/// Notes keep a readable summary, not the whole description.
const NOTES_MAX_LEN: usize = 500;

/// First dollar amount anywhere in the page text.
static PRICE_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*\d[\d,]*(?:\.\d+)?(?:\s*(?:million|mil|mm|m|k)\b)?").expect("invalid regex")
});

pub(crate) struct Pipeline<'a> {
    profile: &'static SourceProfile,
    doc: &'a Document,
    url: &'a ListingUrl,
    resolver: &'a LocationResolver<'a>,
    today: NaiveDate,
    description: Option<String>,
    raw: Map<String, Value>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(
        profile: &'static SourceProfile, doc: &'a Document, url: &'a ListingUrl, resolver: &'a LocationResolver<'a>,
        today: NaiveDate,
    ) -> Self {
        let description = profile.description(doc);
        Self { profile, doc, url, resolver, today, description, raw: Map::new(), diagnostics: Vec::new() }
    }

    /// Run every step and assemble the record.
    pub(crate) fn run(mut self, html: &str) -> (ListingRecord, Vec<Diagnostic>) {
        let listing_name = self.listing_name();
        let (price, price_bucket) = self.price();
        let (acreage, acreage_bucket) = self.acreage();
        let location = self.location();

        let distance = self.resolver.distance(&location);
        self.raw.insert("distance".into(), serde_json::to_value(&distance).unwrap_or_default());

        let property_type = self.property_type(&listing_name);
        let listing_date = self.listing_date();
        let extra = (self.profile.additional_data)(self.doc, self.description.as_deref());
        let notes = self.description.as_deref().map(|d| summarize(d, NOTES_MAX_LEN));

        self.raw.insert("extraction_source".into(), Value::String(self.profile.id.to_string()));
        self.raw.insert("html_sha256".into(), Value::String(document_fingerprint(self.url.as_str(), html)));
        self.raw.insert("html_length".into(), Value::from(html.len()));
        self.raw.extend(extra.raw);
        self.raw.insert("diagnostics".into(), serde_json::to_value(&self.diagnostics).unwrap_or_default());

        let record = ListingRecord {
            listing_name,
            url: self.url.as_str().to_string(),
            platform: self.url.platform(),
            price,
            price_bucket,
            acreage,
            acreage_bucket,
            location,
            distance_bucket: distance.bucket.to_string(),
            property_type,
            house_details: extra.house_details,
            farm_details: extra.farm_details,
            notes,
            listing_date: listing_date.format("%Y-%m-%d").to_string(),
            raw_data: Value::Object(self.raw),
        };
        (record, self.diagnostics)
    }

    /// Unwrap a step's field, warning once about a default.
    fn take<T>(&mut self, field: Field<T>) -> T {
        if let Some(diagnostic) = field.diagnostic {
            tracing::warn!(
                field = diagnostic.field,
                platform = %self.url.platform(),
                reason = %diagnostic.reason,
                "Field not found; using default"
            );
            self.diagnostics.push(diagnostic);
        }
        field.value
    }

    fn note(&mut self, key: &str, text: &str) {
        self.raw.insert(key.to_string(), Value::String(text.to_string()));
    }

    fn listing_name(&mut self) -> String {
        let field = self.find_name();
        self.take(field)
    }

    fn find_name(&self) -> Field<String> {
        let heading = self.doc.first_text(self.profile.name_selectors).or_else(|| self.doc.title());
        if let Some(name) = heading.map(|h| (self.profile.refine_name)(&h)).filter(|n| !n.is_empty()) {
            return Field::found(name);
        }
        if let Some(name) = self.url.name_hint() {
            tracing::debug!(name, "Using listing name from URL");
            return Field::found(name);
        }
        Field::defaulted(UNTITLED_LISTING.to_string(), "listing_name", "no title element or URL slug")
    }

    fn price(&mut self) -> (String, String) {
        let field = self.find_price();
        self.take(field)
    }

    fn find_price(&mut self) -> Field<(String, String)> {
        let text = self
            .doc
            .first_text(self.profile.price_selectors)
            .or_else(|| self.doc.first_label_value(self.profile.price_labels))
            .or_else(|| PRICE_IN_TEXT.find(self.doc.text()).map(|m| m.as_str().to_string()));

        let Some(text) = text else {
            return Field::defaulted(contact_pair(), "price", "no price element, label or amount in text");
        };
        self.note("price_text", &text);

        match clean_price(&text) {
            Ok(pair) => Field::found(pair),
            Err(e) => Field::defaulted(contact_pair(), "price", e.to_string()),
        }
    }

    fn acreage(&mut self) -> (String, String) {
        let field = self.find_acreage();
        self.take(field)
    }

    /// Acreage from source elements, then labels, then page text, then the URL.
    ///
    /// Label values are often bare numbers, so they go through the strict
    /// `parse_acres`. An explicit "Not specified" stops the search.
    fn find_acreage(&mut self) -> Field<(String, String)> {
        for css in self.profile.acreage_selectors {
            if let Some(text) = self.doc.select_text(css)
                && let Some(pair) = acreage_from_lot_text(&text)
            {
                self.note("acreage_text", &text);
                return Field::found(pair);
            }
        }

        let mut reason = String::from("no acreage element, label or amount in text");
        for label in self.profile.acreage_labels {
            let Some(value) = self.doc.label_value(label) else { continue };
            self.note("acreage_text", &value);

            if value.trim().eq_ignore_ascii_case(NOT_SPECIFIED) {
                return Field::defaulted(not_specified_pair(), "acreage", format!("{label} is not specified"));
            }
            if let Some(pair) = acreage_from_lot_text(&value) {
                return Field::found(pair);
            }
            match parse_acres(&value) {
                Ok(acres) => return Field::found(render_acreage(acres)),
                Err(e) => {
                    tracing::debug!(label, error = %e, "Acreage label value is not numeric");
                    reason = e.to_string();
                }
            }
        }

        if let Some(acres) = find_acreage(self.doc.text()) {
            return Field::found(render_acreage(acres));
        }
        if let Some(acres) = self.url.acreage_hint() {
            tracing::debug!(acres, "Using acreage from URL");
            return Field::found(render_acreage(acres));
        }
        Field::defaulted(not_specified_pair(), "acreage", reason)
    }

    fn location(&mut self) -> String {
        let field = self.find_location();
        self.take(field)
    }

    /// First candidate text that resolves to a town.
    fn find_location(&mut self) -> Field<String> {
        let mut candidates: Vec<String> = Vec::new();
        candidates.extend(self.profile.location_selectors.iter().filter_map(|css| self.doc.select_text(css)));
        candidates.extend(self.profile.location_labels.iter().filter_map(|label| self.doc.label_value(label)));
        candidates.extend((self.profile.location_hints)(self.doc));
        candidates.extend(self.url.location_hint());
        candidates.extend(self.description.clone());

        for candidate in &candidates {
            if let Some(location) = self.resolver.try_resolve(candidate) {
                self.note("location_text", candidate);
                return Field::found(location);
            }
        }

        let reason = if candidates.is_empty() {
            "no location text".to_string()
        } else {
            format!("{} candidate(s) named no known town", candidates.len())
        };
        Field::defaulted(LOCATION_UNKNOWN.to_string(), "location", reason)
    }

    fn property_type(&mut self, listing_name: &str) -> PropertyType {
        let field = self.find_property_type(listing_name);
        self.take(field)
    }

    /// Name and explicit type text first, then the description, then the
    /// source's default type.
    fn find_property_type(&self, listing_name: &str) -> Field<PropertyType> {
        let mut primary = listing_name.to_string();
        if let Some(type_text) = self.doc.first_text(self.profile.property_type_selectors) {
            primary.push(' ');
            primary.push_str(&type_text);
        }

        let detected = match extract_property_type(&primary) {
            PropertyType::Unknown => self.description.as_deref().map(extract_property_type).unwrap_or_default(),
            found => found,
        };
        if detected != PropertyType::Unknown {
            return Field::found(detected);
        }

        let fallback = self.profile.default_property_type;
        Field::defaulted(fallback, "property_type", format!("no property type indicator; using {fallback}"))
    }

    fn listing_date(&mut self) -> NaiveDate {
        let found =
            extract_listing_date(self.doc, self.profile.date_selectors, self.profile.date_labels, self.today);
        let field = match found {
            Some(date) => Field::found(date),
            None => Field::defaulted(self.today, "listing_date", "no listing date found; using today"),
        };
        self.take(field)
    }
}

fn contact_pair() -> (String, String) {
    (CONTACT_FOR_PRICE.to_string(), CONTACT_FOR_PRICE.to_string())
}

fn not_specified_pair() -> (String, String) {
    (NOT_SPECIFIED.to_string(), NOT_SPECIFIED.to_string())
}
