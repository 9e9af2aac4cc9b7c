//! Errors raised by strict numeric parsers.
//!
//! These never leave the extraction pipeline. Each step converts them into
//! the field's default plus a diagnostic.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    /// Price text was present but held no usable amount.
    #[error("invalid price format: {0:?}")]
    InvalidPriceFormat(String),

    /// Acreage token was not a number.
    #[error("acreage parse error: {0:?}")]
    AcreageParse(String),
}
