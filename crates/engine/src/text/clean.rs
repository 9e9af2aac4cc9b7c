//! Whitespace, entity and tag cleanup for scraped text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("invalid regex"));

/// Upper bound on cleanup passes. Real input settles in two or three.
const MAX_PASSES: usize = 8;

/// Collapse runs of whitespace to single spaces, drop control characters, and trim.
pub fn collapse_whitespace(text: &str) -> String {
    let without_controls: String = text.chars().filter(|c| !c.is_control() || c.is_whitespace()).collect();
    WHITESPACE.replace_all(&without_controls, " ").trim().to_string()
}

/// Normalize scraped text for display.
///
/// Decodes HTML entities, strips any tags that slipped through, and collapses
/// whitespace. Decoding can expose new markup (`&lt;b&gt;`), so passes repeat
/// until the output stops changing, which makes the function idempotent.
pub fn clean_html(text: &str) -> String {
    let mut current = clean_once(text);
    for _ in 0..MAX_PASSES {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_once(text: &str) -> String {
    if !text.contains(['<', '&']) {
        return collapse_whitespace(text);
    }
    let fragment = Html::parse_fragment(text);
    let joined = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&joined)
}

/// Words following `label` in `text`, up to `max_words`.
///
/// Matching is case-insensitive; a colon after the label is skipped.
pub fn text_after_label(text: &str, label: &str, max_words: usize) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find(&label.to_ascii_lowercase())? + label.len();
    let rest = text.get(start..)?.trim_start().trim_start_matches(':').trim_start();
    let words: Vec<&str> = rest.split_whitespace().take(max_words).collect();
    if words.is_empty() { None } else { Some(words.join(" ")) }
}

/// Cleaned text cut at a word boundary to at most `max_len` characters, with `...` appended when cut.
pub fn summarize(text: &str, max_len: usize) -> String {
    let cleaned = clean_html(text);
    if cleaned.chars().count() <= max_len {
        return cleaned;
    }
    let cut: String = cleaned.chars().take(max_len).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end_matches([',', '.', ';', ':']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html_collapses_whitespace() {
        assert_eq!(clean_html("  Sunny\n\n  Acres \t Farm  "), "Sunny Acres Farm");
    }

    #[test]
    fn test_clean_html_decodes_entities() {
        assert_eq!(clean_html("Barn &amp; Silo&nbsp;included"), "Barn & Silo included");
    }

    #[test]
    fn test_clean_html_strips_tags() {
        assert_eq!(clean_html("<p>Three <b>bed</b> cape</p>"), "Three bed cape");
    }

    #[test]
    fn test_clean_html_strips_entity_encoded_tags() {
        let cleaned = clean_html("&lt;span&gt;45 acres&lt;/span&gt;");
        assert_eq!(cleaned, "45 acres");
        assert!(!cleaned.contains('<'));
    }

    #[test]
    fn test_clean_html_idempotent() {
        let inputs = [
            "  plain   text ",
            "<div>Price: &#36;450,000</div>",
            "&amp;lt;b&amp;gt;nested&amp;lt;/b&amp;gt;",
            "Fields &amp; woods\u{a0}\u{a0}near <i>Camden</i>",
            "5 < 10 & 10 > 5",
            "",
        ];
        for input in inputs {
            let once = clean_html(input);
            assert_eq!(clean_html(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_clean_html_drops_control_characters() {
        assert_eq!(clean_html("Farm\u{7}stand"), "Farmstand");
    }

    #[test]
    fn test_text_after_label() {
        let text = "Property details Total number of acres: 45 Location Brunswick";
        assert_eq!(text_after_label(text, "total number of acres", 1), Some("45".to_string()));
        assert_eq!(text_after_label(text, "Missing label", 3), None);
        assert_eq!(text_after_label("Location:", "Location", 3), None);
    }

    #[test]
    fn test_summarize_short_text_unchanged() {
        assert_eq!(summarize("Small farm", 100), "Small farm");
    }

    #[test]
    fn test_summarize_cuts_on_word_boundary() {
        let summary = summarize("Beautiful farmhouse with attached barn, open fields and river frontage", 30);
        assert_eq!(summary, "Beautiful farmhouse with...");
    }
}
