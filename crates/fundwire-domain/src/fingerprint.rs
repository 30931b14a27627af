//! Content fingerprinting
//!
//! Articles are deduplicated by a SHA-256 digest of their raw text. The same
//! text always yields the same fingerprint, regardless of how the article
//! reached the pipeline (manual paste, CSV row, WordPress import).

use sha2::{Digest, Sha256};

/// Compute the SHA-256 fingerprint of article text, hex-encoded.
///
/// Pure and deterministic. The digest is used as a uniqueness key, not as a
/// general-purpose hash; collisions are cryptographically negligible.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
