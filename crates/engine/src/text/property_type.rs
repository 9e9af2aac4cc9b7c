//! Keyword-based property type detection.

use std::sync::LazyLock;

use listings_core::PropertyType;
use regex::Regex;

/// Indicators per type, checked in this order. The first type with any hit wins.
const INDICATORS: &[(PropertyType, &[&str])] = &[
    (
        PropertyType::SingleFamily,
        &[
            r"single[\s-]?family",
            r"residential home",
            r"\d+\s*(?:bed|br\b|bedroom)",
            r"single story",
            r"residential property",
        ],
    ),
    (
        PropertyType::MultiFamily,
        &[r"multi[\s-]?family", r"\bduplex\b", r"\btriplex\b", r"\bfourplex\b", r"apartment building"],
    ),
    (
        PropertyType::Farm,
        &[r"\bfarm", r"\branch\b", r"agricultur", r"\bpasture", r"crop\s?land", r"\bdairy\b", r"\borchard"],
    ),
    // A bare "house" or "home" only settles the type once no farm words are present.
    (PropertyType::SingleFamily, &[r"\bhouse\b", r"\bhome\b"]),
    (
        PropertyType::Land,
        &[r"undeveloped land", r"vacant lot", r"land parcel", r"empty lot", r"raw land", r"\bland\b", r"\blot\b"],
    ),
    (
        PropertyType::Commercial,
        &[r"commercial", r"\bbusiness\b", r"\bretail\b", r"\boffice\b", r"industrial", r"investment property"],
    ),
];

static COMPILED: LazyLock<Vec<(PropertyType, Regex)>> = LazyLock::new(|| {
    INDICATORS
        .iter()
        .map(|(kind, patterns)| {
            let alternation = format!("(?i)(?:{})", patterns.join("|"));
            (*kind, Regex::new(&alternation).expect("invalid regex"))
        })
        .collect()
});

/// Detect the property type from listing text. No indicator gives `Unknown`.
pub fn extract_property_type(text: &str) -> PropertyType {
    COMPILED
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map_or(PropertyType::Unknown, |(kind, _)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_each_type() {
        assert_eq!(extract_property_type("Charming single-family cape"), PropertyType::SingleFamily);
        assert_eq!(extract_property_type("Income-producing duplex downtown"), PropertyType::MultiFamily);
        assert_eq!(extract_property_type("Certified organic farmland with barn"), PropertyType::Farm);
        assert_eq!(extract_property_type("Wooded land parcel with road frontage"), PropertyType::Land);
        assert_eq!(extract_property_type("Retail storefront on Main Street"), PropertyType::Commercial);
    }

    #[test]
    fn test_unknown_when_no_indicator() {
        assert_eq!(extract_property_type("Beautiful views"), PropertyType::Unknown);
        assert_eq!(extract_property_type(""), PropertyType::Unknown);
    }

    #[test]
    fn test_priority_order() {
        // "3 bed" outranks "farm"
        assert_eq!(extract_property_type("3 bed farmhouse on 40 acres of farm land"), PropertyType::SingleFamily);
        // "farm" outranks "land"
        assert_eq!(extract_property_type("Farm land for lease"), PropertyType::Farm);
        assert_eq!(extract_property_type("Working farm with a home and barn"), PropertyType::Farm);
        assert_eq!(extract_property_type("Hay fields, pasture and an old house"), PropertyType::Farm);
        assert_eq!(extract_property_type("Cape-style home on a quiet lot"), PropertyType::SingleFamily);
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(extract_property_type("Landscaped grounds"), PropertyType::Unknown);
        assert_eq!(extract_property_type("Homestead"), PropertyType::Unknown);
    }
}
