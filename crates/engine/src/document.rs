//! Parsed listing page with the small query surface extractors need.

use listings_core::Error;
use scraper::{ElementRef, Html, Selector};

use crate::text::collapse_whitespace;

/// Elements whose text never belongs in listing content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// An already-fetched HTML page.
pub struct Document {
    html: Html,
    text: String,
}

impl Document {
    /// Parse a page.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnparseableDocument` if the input is empty,
    /// whitespace-only, or contains NUL bytes (binary content).
    pub fn parse(html: &str) -> Result<Self, Error> {
        if html.trim().is_empty() {
            return Err(Error::UnparseableDocument("document is empty".into()));
        }
        if html.contains('\0') {
            return Err(Error::UnparseableDocument("document contains binary content".into()));
        }

        let html = Html::parse_document(html);
        let text = visible_text(html.root_element());
        Ok(Self { html, text })
    }

    /// All visible text, whitespace-collapsed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Contents of `<title>`.
    pub fn title(&self) -> Option<String> {
        self.select_text("title")
    }

    /// Text of the first element matching `css` that has any.
    pub fn select_text(&self, css: &str) -> Option<String> {
        let selector = parse_selector(css)?;
        self.html.select(&selector).map(visible_text).find(|t| !t.is_empty())
    }

    /// [`Document::select_text`] over several selectors, first hit wins.
    pub fn first_text(&self, selectors: &[&str]) -> Option<String> {
        selectors.iter().find_map(|css| {
            let found = self.select_text(css);
            if found.is_some() {
                tracing::debug!(selector = css, "Selector matched");
            }
            found
        })
    }

    /// Non-empty texts of every element matching `css`.
    pub fn select_all_text(&self, css: &str) -> Vec<String> {
        let Some(selector) = parse_selector(css) else {
            return Vec::new();
        };
        self.html.select(&selector).map(visible_text).filter(|t| !t.is_empty()).collect()
    }

    /// Attribute of the first element matching `css` that carries it.
    pub fn select_attr(&self, css: &str, attr: &str) -> Option<String> {
        let selector = parse_selector(css)?;
        self.html
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(collapse_whitespace)
            .find(|v| !v.is_empty())
    }

    /// Content of `<meta name=..>` or `<meta property=..>`.
    pub fn meta(&self, name: &str) -> Option<String> {
        self.select_attr(&format!("meta[name=\"{name}\"]"), "content")
            .or_else(|| self.select_attr(&format!("meta[property=\"{name}\"]"), "content"))
    }

    /// Date-bearing values of elements matching `css`: the `datetime`
    /// attribute when present, then the element text.
    pub fn date_values(&self, css: &str) -> Vec<String> {
        let Some(selector) = parse_selector(css) else {
            return Vec::new();
        };
        let mut values = Vec::new();
        for el in self.html.select(&selector) {
            if let Some(dt) = el.value().attr("datetime") {
                values.push(dt.trim().to_string());
            }
            let text = visible_text(el);
            if !text.is_empty() {
                values.push(text);
            }
        }
        values
    }

    /// Value shown next to a label such as "Total number of acres".
    ///
    /// Handles the layouts listing pages use: a label element followed by a
    /// value element (`<dt>`/`<dd>`, paired `<div>`s), and a label element
    /// followed by bare text inside the same parent (`<strong>Acreage:</strong> 45`).
    pub fn label_value(&self, label: &str) -> Option<String> {
        let wanted = normalize_label(label);
        for node in self.html.root_element().descendants() {
            let Some(el) = ElementRef::wrap(node) else { continue };
            if SKIPPED_ELEMENTS.contains(&el.value().name()) {
                continue;
            }
            let own = visible_text(el);
            if normalize_label(&own) != wanted {
                continue;
            }

            let sibling = el.next_siblings().filter_map(ElementRef::wrap).map(visible_text).find(|t| !t.is_empty());
            if sibling.is_some() {
                return sibling;
            }

            if let Some(parent) = el.parent().and_then(ElementRef::wrap) {
                let whole = visible_text(parent);
                if let Some(rest) = whole.strip_prefix(own.as_str()) {
                    let rest = rest.trim_start_matches(':').trim();
                    if !rest.is_empty() {
                        return Some(rest.to_string());
                    }
                }
            }
        }
        None
    }

    /// First label in `labels` that has a value.
    pub fn first_label_value(&self, labels: &[&str]) -> Option<String> {
        labels.iter().find_map(|label| self.label_value(label))
    }
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!(selector = css, "Skipping invalid selector: {}", e);
            None
        }
    }
}

fn normalize_label(text: &str) -> String {
    text.trim().trim_end_matches(':').trim().to_lowercase()
}

/// Text under `root`, skipping script-like elements, whitespace-collapsed.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| SKIPPED_ELEMENTS.contains(&el.value().name()));
        if !hidden {
            parts.push(&**text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
        <head>
            <title>Sunny Acres Farm | Brunswick, ME</title>
            <meta name="url-extracted-location" content="Brunswick, ME">
            <script>var price = "$1";</script>
        </head>
        <body>
            <h1 class="title">  Sunny   Acres Farm </h1>
            <div class="row"><div class="label">Total number of acres</div><div class="value">45</div></div>
            <dl><dt>Location:</dt><dd>Brunswick, Maine</dd></dl>
            <p><strong>Acreage:</strong> 12 acres</p>
            <ul><li class="feature">Barn</li><li class="feature">Pond</li></ul>
            <time datetime="2024-03-15">March 15</time>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(Document::parse(""), Err(Error::UnparseableDocument(_))));
        assert!(matches!(Document::parse(" \n\t "), Err(Error::UnparseableDocument(_))));
    }

    #[test]
    fn test_parse_rejects_binary() {
        assert!(matches!(Document::parse("\u{0}\u{1}PNG"), Err(Error::UnparseableDocument(_))));
    }

    #[test]
    fn test_select_text_collapses_whitespace() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(doc.select_text("h1.title").as_deref(), Some("Sunny Acres Farm"));
        assert_eq!(doc.first_text(&[".missing", "h1"]).as_deref(), Some("Sunny Acres Farm"));
    }

    #[test]
    fn test_text_skips_scripts() {
        let doc = Document::parse(PAGE).unwrap();
        assert!(!doc.text().contains("var price"));
        assert!(doc.text().contains("Total number of acres 45"));
    }

    #[test]
    fn test_meta_and_title() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(doc.meta("url-extracted-location").as_deref(), Some("Brunswick, ME"));
        assert_eq!(doc.title().as_deref(), Some("Sunny Acres Farm | Brunswick, ME"));
    }

    #[test]
    fn test_label_value_layouts() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(doc.label_value("Total number of acres").as_deref(), Some("45"));
        assert_eq!(doc.label_value("location").as_deref(), Some("Brunswick, Maine"));
        assert_eq!(doc.label_value("Acreage").as_deref(), Some("12 acres"));
        assert_eq!(doc.label_value("Water sources"), None);
    }

    #[test]
    fn test_select_all_and_dates() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(doc.select_all_text("li.feature"), vec!["Barn".to_string(), "Pond".to_string()]);
        assert_eq!(doc.date_values("time"), vec!["2024-03-15".to_string(), "March 15".to_string()]);
    }

    #[test]
    fn test_invalid_selector_is_a_miss() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(doc.select_text("div[["), None);
        assert!(doc.select_all_text("div[[").is_empty());
    }
}
