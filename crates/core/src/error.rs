//! Unified error types for the listings engine.
//!
//! Only structural failures live here. A field that is missing or malformed
//! never becomes an `Error`; it is defaulted by the pipeline instead.

/// Pipeline-fatal errors. Any of these aborts extraction of one listing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document was empty, whitespace-only, or not text.
    #[error("UNPARSEABLE_DOCUMENT: {0}")]
    UnparseableDocument(String),

    /// No extractor is registered for the listing's host.
    #[error("UNSUPPORTED_SOURCE: {0}")]
    UnsupportedSource(String),

    /// Listing URL could not be parsed.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Gazetteer data could not be loaded or is internally inconsistent.
    #[error("GAZETTEER_ERROR: {0}")]
    Gazetteer(String),
}

impl Error {
    /// Stable machine-readable code, the prefix of the display string.
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnparseableDocument(_) => "UNPARSEABLE_DOCUMENT",
            Error::UnsupportedSource(_) => "UNSUPPORTED_SOURCE",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::Gazetteer(_) => "GAZETTEER_ERROR",
        }
    }
}
