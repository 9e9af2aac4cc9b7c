//! Per-field outcomes of the extraction pipeline.

use serde::Serialize;

/// Why a field holds its default instead of an extracted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub field: &'static str,
    pub reason: String,
}

/// A field value plus the diagnostic explaining a fallback, if one happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    pub value: T,
    pub diagnostic: Option<Diagnostic>,
}

impl<T> Field<T> {
    pub fn found(value: T) -> Self {
        Self { value, diagnostic: None }
    }

    pub fn defaulted(value: T, field: &'static str, reason: impl Into<String>) -> Self {
        Self { value, diagnostic: Some(Diagnostic { field, reason: reason.into() }) }
    }

    pub fn is_default(&self) -> bool {
        self.diagnostic.is_some()
    }
}
