//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! infrastructure. Implementations live in other crates (`fundwire-llm`,
//! `fundwire-store`); test fakes implement them directly.

use crate::message::ChatMessage;
use crate::record::{ExtractionRecord, NewExtraction};
use async_trait::async_trait;

/// A chat-completion LLM endpoint.
///
/// One call sends the full conversation and returns the assistant's reply
/// text. Any error here is an infrastructure (transport) failure; callers
/// must not retry through this trait.
#[async_trait]
pub trait ChatProvider {
    /// Error type for provider operations
    type Error: std::fmt::Display + Send + Sync;

    /// Send the conversation and return the model's reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error>;
}

/// Storage for extraction records.
///
/// Implemented by the infrastructure layer (`fundwire-store`).
pub trait ExtractionStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Insert or update an extraction, keyed by (user_id, content_hash).
    ///
    /// On conflict the existing record's payload, source URL, and timestamp
    /// are overwritten; its id is preserved. Atomic: concurrent writers to
    /// the same key are linearized by the storage layer.
    fn upsert_extraction(&mut self, extraction: NewExtraction) -> Result<(), Self::Error>;

    /// All extractions for a user, newest first. No pagination; callers
    /// truncate for preview.
    fn extractions_for_user(&self, user_id: i64) -> Result<Vec<ExtractionRecord>, Self::Error>;
}
