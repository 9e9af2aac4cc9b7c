//! Price parsing, rendering and bucketing.

use std::sync::LazyLock;

use listings_core::buckets::{CONTACT_FOR_PRICE, price_bucket};
use regex::Regex;

use super::clean::clean_html;
use super::error::NormalizeError;

/// Dollar-prefixed amount, optionally with a magnitude suffix.
static DOLLAR_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*(\d[\d,]*(?:\.\d+)?)\s*(million|mil|mm|m|thousand|k)?\b").expect("invalid regex")
});

/// Any amount, used when no `$` is present.
static BARE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(million|mil|mm|m|thousand|k)?\b").expect("invalid regex")
});

/// Phrases listing sites use in place of a price.
static NO_PRICE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:contact|call|inquire|request|price on application|auction|tbd|n/a|not disclosed)\b",
    )
    .expect("invalid regex")
});

/// Parse a listing price into its rendered form and bucket.
///
/// Accepts commas, `$`, `k`/`M` suffixes and ranges (the lower bound wins).
/// Empty input and "Contact for price"-style phrases give the contact pair,
/// unless a `$` amount is also present.
///
/// Amounts are rounded to whole dollars. At or above one million they render
/// as `$X.XM` with exactly one decimal; below that as `$N,NNN`. The bucket is
/// chosen from the rendered amount so the pair always agrees.
///
/// # Errors
///
/// Returns `NormalizeError::InvalidPriceFormat` if the text holds no positive amount.
pub fn clean_price(raw: &str) -> Result<(String, String), NormalizeError> {
    let text = clean_html(raw);
    if text.is_empty() {
        return Ok(contact_pair());
    }

    let captures = match DOLLAR_AMOUNT.captures(&text) {
        Some(captures) => captures,
        None if NO_PRICE_PHRASE.is_match(&text) => return Ok(contact_pair()),
        None => BARE_AMOUNT.captures(&text).ok_or_else(|| NormalizeError::InvalidPriceFormat(raw.to_string()))?,
    };

    let digits = captures[1].replace(',', "");
    let amount: f64 = digits.parse().map_err(|_| NormalizeError::InvalidPriceFormat(raw.to_string()))?;
    let multiplier = match captures.get(2).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
        Some("k" | "thousand") => 1_000.0,
        Some("m" | "mm" | "mil" | "million") => 1_000_000.0,
        _ => 1.0,
    };

    let dollars = (amount * multiplier).round();
    if !dollars.is_finite() || dollars <= 0.0 {
        return Err(NormalizeError::InvalidPriceFormat(raw.to_string()));
    }

    Ok(render_price(dollars))
}

fn contact_pair() -> (String, String) {
    (CONTACT_FOR_PRICE.to_string(), CONTACT_FOR_PRICE.to_string())
}

fn render_price(dollars: f64) -> (String, String) {
    if dollars >= 1_000_000.0 {
        let tenths = (dollars / 100_000.0).round();
        let shown = tenths * 100_000.0;
        (format!("${:.1}M", tenths / 10.0), price_bucket(shown).to_string())
    } else {
        (format!("${}", group_thousands(dollars as u64)), price_bucket(dollars).to_string())
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
