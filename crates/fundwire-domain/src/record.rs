//! Persisted record types
//!
//! The extraction payload is intentionally schema-free: whatever JSON object
//! the LLM returns is stored as-is, and consumers read optional keys
//! defensively. Two historical prompt variants coexist in stored data (flat
//! `Investisseur 1..13` columns and a single `Investisseurs` list); neither
//! is canonical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The open key-value mapping returned by a successful extraction.
pub type ExtractedFields = serde_json::Map<String, serde_json::Value>;

/// A registered user.
///
/// Password hashing and session management live outside this core; the hash
/// column is carried for schema compatibility and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Row id
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Opaque password hash, if one was ever set
    pub password_hash: Option<String>,
    /// Per-user system prompt override; `None` falls back to the platform default
    pub custom_system_prompt: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting or updating one extraction.
#[derive(Debug, Clone)]
pub struct NewExtraction {
    /// Owning user
    pub user_id: i64,
    /// Raw article text as submitted
    pub original_content: String,
    /// Schema-free JSON object produced by the LLM
    pub extracted_data: serde_json::Value,
    /// Fingerprint of `original_content`; uniqueness key with `user_id`
    pub content_hash: String,
    /// Where the article came from, when known
    pub source_url: Option<String>,
}

/// One persisted extraction.
///
/// For a given user, `content_hash` is unique: re-submitting identical text
/// overwrites the prior record's payload and timestamp while preserving its
/// id. Records are never deleted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Row id, stable across overwrites
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Raw article text
    pub original_content: String,
    /// Schema-free JSON object produced by the LLM
    pub extracted_data: serde_json::Value,
    /// Fingerprint of `original_content`
    pub content_hash: String,
    /// Source URL, when known
    pub source_url: Option<String>,
    /// Time of the latest write to this record
    pub created_at: DateTime<Utc>,
}
