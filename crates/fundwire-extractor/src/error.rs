//! Error types for the extraction pipeline

use thiserror::Error;

/// Errors that can occur during extraction.
///
/// Transport and malformed-output failures are distinct variants, but
/// callers are expected to treat both as "extraction failed"; only the
/// logged diagnostics differ.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Article text was empty or whitespace; rejected before any LLM call
    #[error("article text is empty")]
    EmptyArticle,

    /// Network or HTTP failure reaching the LLM endpoint; never retried
    #[error("LLM request failed: {0}")]
    Transport(String),

    /// No parseable JSON object after exhausting the repair budget
    #[error("no valid JSON object in LLM reply after {attempts} attempts")]
    MalformedOutput {
        /// Total requests issued, including the initial one
        attempts: u32,
    },
}
