//! Content fingerprint for an extracted document.

use sha2::{Digest, Sha256};

/// SHA-256 over the listing URL and the HTML it was extracted from.
///
/// Stored in `raw_data` so a record can be traced back to the exact page
/// snapshot that produced it.
pub fn document_fingerprint(url: &str, html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    hasher.update(html.as_bytes());
    hex::encode(hasher.finalize())
}
