//! Listing URL canonicalization, platform detection and slug hints.

use std::sync::LazyLock;

use listings_core::{Error, Platform, gazetteer};
use regex::Regex;
use url::Url;

/// Canonical form of a listing URL.
///
/// Whitespace is trimmed, a missing scheme becomes https, the host is
/// lowercased and the fragment dropped. The query string is kept as-is
/// since some platforms carry the listing id there.
///
/// # Errors
///
/// Returns `Error::InvalidUrl` for empty input, non-HTTP schemes and
/// anything `url` cannot parse.
pub fn canonicalize(input: &str) -> Result<Url, Error> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("empty URL".into()));
    }

    let with_scheme = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };
    let mut url = Url::parse(&with_scheme).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!("unsupported scheme {:?}", url.scheme())));
    }

    if let Some(host) = url.host_str().map(str::to_lowercase) {
        url.set_host(Some(&host)).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    }
    url.set_fragment(None);

    Ok(url)
}

/// `..._Portland_ME_04101_...` in realtor.com detail paths.
static CITY_STATE_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([A-Za-z][A-Za-z-]*)_([A-Z]{2})_\d{5}").expect("invalid regex"));

static SLUG_ACRES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^\d.])(\d+(?:\.\d+)?)[\s-]acres?\b").expect("invalid regex"));

/// A canonical listing URL and the platform serving it.
#[derive(Debug, Clone)]
pub struct ListingUrl {
    url: Url,
    platform: Platform,
}

impl ListingUrl {
    /// Canonicalize `input` and detect its platform.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the URL cannot be canonicalized and
    /// `Error::UnsupportedSource` if no platform serves its host.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let url = canonicalize(input)?;
        let host = url.host_str().unwrap_or_default();
        let platform = Platform::from_host(host).ok_or_else(|| Error::UnsupportedSource(host.to_string()))?;
        Ok(Self { url, platform })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn decoded_path(&self) -> String {
        self.url
            .path_segments()
            .map(|segments| {
                segments
                    .map(percent_decode)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }

    /// Last path segment that reads as words rather than an id.
    fn slug(&self) -> Option<String> {
        let path = self.decoded_path();
        path.rsplit('/')
            .find(|segment| segment.chars().filter(|c| c.is_ascii_alphabetic()).count() >= 3)
            .map(str::to_string)
    }

    /// Acreage spelled into the path, e.g. `45-acres-in-waldo-county`.
    pub fn acreage_hint(&self) -> Option<f64> {
        let path = self.decoded_path();
        let captures = SLUG_ACRES.captures(&path)?;
        captures[1].parse().ok()
    }

    /// Location spelled into the path.
    ///
    /// Realtor paths carry `_City_ST_zip`; other sources end their slug in
    /// `...-town-st`, `...-town-state` or `...-name-county-state`.
    pub fn location_hint(&self) -> Option<String> {
        let path = self.decoded_path();
        if let Some(c) = CITY_STATE_ZIP.captures(&path) {
            return Some(format!("{}, {}", c[1].replace('-', " "), &c[2]));
        }

        let slug = self.slug()?.to_lowercase();
        let tokens: Vec<&str> = slug.split(['-', '_']).filter(|t| !t.is_empty()).collect();
        let (state_idx, state) = tokens.iter().enumerate().rev().find_map(|(i, token)| {
            let code = token.to_ascii_uppercase();
            let state = gazetteer::state_code(token)
                .map(str::to_string)
                .or_else(|| gazetteer::NEW_ENGLAND_STATES.iter().any(|(_, c)| *c == code).then_some(code));
            state.map(|s| (i, s))
        })?;

        match state_idx {
            0 => None,
            i if i >= 2 && tokens[i - 1] == "county" => {
                Some(format!("{} County, {}", capitalize(tokens[i - 2]), state))
            }
            i => Some(format!("{}, {}", capitalize(tokens[i - 1]), state)),
        }
    }

    /// Human-readable name from the slug, e.g. `sunny-acres-farm` to `Sunny Acres Farm`.
    ///
    /// Realtor slugs give the street address: `123-Main-St_Portland_ME_...` to `123 Main St`.
    pub fn name_hint(&self) -> Option<String> {
        let slug = self.slug()?;
        if CITY_STATE_ZIP.is_match(&slug) {
            let street = slug.split('_').next().unwrap_or_default().replace('-', " ");
            return (!street.trim().is_empty()).then(|| street.trim().to_string());
        }
        let words: Vec<String> = slug
            .split(['-', '_'])
            .filter(|w| !w.is_empty() && !w.chars().all(|c| c.is_ascii_digit()))
            .map(capitalize)
            .collect();
        if words.is_empty() { None } else { Some(words.join(" ")) }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Decodes `%20`-style escapes; malformed escapes are kept literally.
fn percent_decode(segment: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes())).into_owned()
}
