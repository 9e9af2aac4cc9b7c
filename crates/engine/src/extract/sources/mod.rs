//! Source profiles, one module per listing site family.

pub mod farmland;
pub mod landandfarm;
pub mod realtor;

use serde_json::{Map, Value};

/// Inserts `value` under `key` when present.
pub(crate) fn insert_text(raw: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        raw.insert(key.to_string(), Value::String(value));
    }
}

/// Name text before the first of `separators`, trimmed.
pub(crate) fn cut_at(name: &str, separators: &[&str]) -> String {
    let end = separators.iter().filter_map(|sep| name.find(sep)).min().unwrap_or(name.len());
    let cut = name[..end].trim();
    if cut.is_empty() { name.trim().to_string() } else { cut.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_at_first_separator() {
        assert_eq!(cut_at("Sunny Acres • Brunswick | NEFF", &["•", "|"]), "Sunny Acres");
        assert_eq!(cut_at("No separators here", &["|"]), "No separators here");
        assert_eq!(cut_at("| Leading", &["|"]), "| Leading");
    }

    #[test]
    fn test_insert_text_skips_none() {
        let mut raw = Map::new();
        insert_text(&mut raw, "a", Some("x".into()));
        insert_text(&mut raw, "b", None);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw["a"], "x");
    }
}
