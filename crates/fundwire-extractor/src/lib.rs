//! Fundwire Extractor
//!
//! Converts free-text fundraising articles into structured JSON via an LLM,
//! with a bounded self-correction loop for malformed replies.
//!
//! # Overview
//!
//! The client seeds a conversation with a system prompt and the article
//! text, asks the model once, and scans the reply for a JSON object. When
//! the reply contains no parseable object, the malformed reply plus a
//! correction instruction are appended to the conversation and the whole
//! grown history is resent, at most `max_retries` extra times. Transport
//! failures abort immediately and are never retried.
//!
//! # Architecture
//!
//! ```text
//! Article → ExtractionClient → ChatProvider → reply → bracket scan → JSON
//!                 ↑ ______________ repair turn _____________ ↓ (bounded)
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use fundwire_extractor::ExtractionClient;
//! use fundwire_llm::MockChat;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockChat::new(r#"{"Montant": "5M€", "Tour": "Série A"}"#);
//! let client = ExtractionClient::new(provider);
//!
//! let fields = client
//!     .extract("Acme lève 5 millions d'euros en série A.", "Extract fundraising data as JSON.")
//!     .await?;
//!
//! assert_eq!(fields["Montant"], "5M€");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod conversation;
mod error;
mod parser;

pub use client::{ExtractionClient, DEFAULT_MAX_RETRIES};
pub use error::ExtractorError;
