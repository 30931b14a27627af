//! Fundwire Storage Layer
//!
//! SQLite-backed persistence for users and extraction records.
//!
//! # Architecture
//!
//! - `users`: login name, optional password hash, optional per-user system
//!   prompt override
//! - `extractions`: one row per unique article per user, enforced by
//!   `UNIQUE (user_id, content_hash)`; the JSON payload is stored as text
//!
//! The upsert is a single `INSERT … ON CONFLICT … DO UPDATE`, so callers
//! never pre-check existence and concurrent writers to the same key are
//! linearized by SQLite itself.
//!
//! # Examples
//!
//! ```no_run
//! use fundwire_store::SqliteStore;
//!
//! let store = SqliteStore::new("fundwire.db").unwrap();
//! // Store is now ready for user and extraction operations
//! ```

#![warn(missing_docs)]

use chrono::Utc;
use fundwire_domain::{ExtractionRecord, ExtractionStore, NewExtraction, User};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Username already registered
    #[error("username already exists: {0}")]
    UsernameTaken(String),

    /// Referenced user does not exist
    #[error("user not found: {0}")]
    UserNotFound(String),
}

/// SQLite-backed store for users and extractions.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// `SqliteStore` instance; the unique constraint still serializes writers
/// to the same (user, hash) key across connections.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at the given path.
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<(), StoreError> {
        // Cascade delete from users requires foreign keys per connection
        self.conn.pragma_update(None, "foreign_keys", true)?;

        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Register a new user.
    ///
    /// The password hash is opaque to this layer and may be absent;
    /// authentication is handled outside the core.
    pub fn add_user(
        &mut self,
        username: &str,
        password_hash: Option<&str>,
    ) -> Result<User, StoreError> {
        let created_at = Utc::now();

        self.conn
            .execute(
                "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
                params![username, password_hash, created_at],
            )
            .map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => {
                    StoreError::UsernameTaken(username.to_string())
                }
                _ => StoreError::Database(e),
            })?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.map(String::from),
            custom_system_prompt: None,
            created_at,
        })
    }

    /// Look up a user by login name.
    pub fn user_by_name(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, password_hash, custom_system_prompt, created_at
                 FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        custom_system_prompt: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Set or clear a user's system prompt override.
    pub fn update_user_prompt(
        &mut self,
        user_id: i64,
        prompt: Option<&str>,
    ) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE users SET custom_system_prompt = ?1 WHERE id = ?2",
            params![prompt, user_id],
        )?;

        if updated == 0 {
            return Err(StoreError::UserNotFound(format!("id {}", user_id)));
        }
        Ok(())
    }

    /// Insert or update an extraction, keyed by (user_id, content_hash).
    ///
    /// On conflict the payload, source URL, and timestamp are overwritten;
    /// the row id is preserved. Last write wins.
    pub fn upsert_extraction(&mut self, extraction: NewExtraction) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO extractions
                     (user_id, original_content, extracted_data, content_hash, source_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (user_id, content_hash) DO UPDATE SET
                     original_content = excluded.original_content,
                     extracted_data = excluded.extracted_data,
                     source_url = excluded.source_url,
                     created_at = excluded.created_at",
                params![
                    extraction.user_id,
                    extraction.original_content,
                    extraction.extracted_data,
                    extraction.content_hash,
                    extraction.source_url,
                    Utc::now(),
                ],
            )
            .map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => {
                    StoreError::UserNotFound(format!("id {}", extraction.user_id))
                }
                _ => StoreError::Database(e),
            })?;

        Ok(())
    }

    /// All extractions for a user, newest first.
    pub fn extractions_for_user(&self, user_id: i64) -> Result<Vec<ExtractionRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, original_content, extracted_data, content_hash, source_url, created_at
             FROM extractions WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let records = stmt
            .query_map(params![user_id], |row| {
                Ok(ExtractionRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    original_content: row.get(2)?,
                    extracted_data: row.get(3)?,
                    content_hash: row.get(4)?,
                    source_url: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

impl ExtractionStore for SqliteStore {
    type Error = StoreError;

    fn upsert_extraction(&mut self, extraction: NewExtraction) -> Result<(), Self::Error> {
        SqliteStore::upsert_extraction(self, extraction)
    }

    fn extractions_for_user(&self, user_id: i64) -> Result<Vec<ExtractionRecord>, Self::Error> {
        SqliteStore::extractions_for_user(self, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundwire_domain::fingerprint;

    fn store_with_user() -> (SqliteStore, i64) {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let user = store.add_user("alice", None).unwrap();
        (store, user.id)
    }

    fn new_extraction(user_id: i64, content: &str, data: serde_json::Value) -> NewExtraction {
        NewExtraction {
            user_id,
            original_content: content.to_string(),
            extracted_data: data,
            content_hash: fingerprint(content),
            source_url: None,
        }
    }

    #[test]
    fn test_add_and_fetch_user() {
        let (store, _) = store_with_user();
        let user = store.user_by_name("alice").unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert!(user.password_hash.is_none());
        assert!(user.custom_system_prompt.is_none());
    }

    #[test]
    fn test_unknown_user_is_none() {
        let (store, _) = store_with_user();
        assert!(store.user_by_name("bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (mut store, _) = store_with_user();
        let result = store.add_user("alice", None);
        assert!(matches!(result, Err(StoreError::UsernameTaken(_))));
    }

    #[test]
    fn test_update_and_clear_user_prompt() {
        let (mut store, user_id) = store_with_user();

        store
            .update_user_prompt(user_id, Some("Réponds uniquement en JSON."))
            .unwrap();
        let user = store.user_by_name("alice").unwrap().unwrap();
        assert_eq!(
            user.custom_system_prompt.as_deref(),
            Some("Réponds uniquement en JSON.")
        );

        store.update_user_prompt(user_id, None).unwrap();
        let user = store.user_by_name("alice").unwrap().unwrap();
        assert!(user.custom_system_prompt.is_none());
    }

    #[test]
    fn test_update_prompt_for_missing_user() {
        let (mut store, _) = store_with_user();
        let result = store.update_user_prompt(9999, Some("x"));
        assert!(matches!(result, Err(StoreError::UserNotFound(_))));
    }

    #[test]
    fn test_upsert_then_list() {
        let (mut store, user_id) = store_with_user();
        let content = "Acme raised $5M.";

        store
            .upsert_extraction(new_extraction(
                user_id,
                content,
                serde_json::json!({"Montant": "5M"}),
            ))
            .unwrap();

        let records = store.extractions_for_user(user_id).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_content, content);
        assert_eq!(records[0].content_hash, fingerprint(content));
        assert_eq!(records[0].extracted_data["Montant"], "5M");
    }

    #[test]
    fn test_upsert_is_idempotent_per_content() {
        let (mut store, user_id) = store_with_user();
        let content = "Acme raised $5M.";

        store
            .upsert_extraction(new_extraction(
                user_id,
                content,
                serde_json::json!({"Montant": "5M"}),
            ))
            .unwrap();
        let first_id = store.extractions_for_user(user_id).unwrap()[0].id;

        store
            .upsert_extraction(new_extraction(
                user_id,
                content,
                serde_json::json!({"Montant": "5M€", "Tour": "Seed"}),
            ))
            .unwrap();

        let records = store.extractions_for_user(user_id).unwrap();
        // Exactly one row, id preserved, payload from the second call
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, first_id);
        assert_eq!(records[0].extracted_data["Montant"], "5M€");
        assert_eq!(records[0].extracted_data["Tour"], "Seed");
    }

    #[test]
    fn test_upsert_last_write_wins() {
        let (mut store, user_id) = store_with_user();
        let content = "Same article, two writers.";

        for payload in ["first", "second"] {
            store
                .upsert_extraction(new_extraction(
                    user_id,
                    content,
                    serde_json::json!({"writer": payload}),
                ))
                .unwrap();
        }

        let records = store.extractions_for_user(user_id).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].extracted_data["writer"], "second");
    }

    #[test]
    fn test_upsert_overwrites_source_url() {
        let (mut store, user_id) = store_with_user();
        let content = "Imported twice through different channels.";

        let mut manual = new_extraction(user_id, content, serde_json::json!({}));
        manual.source_url = None;
        store.upsert_extraction(manual).unwrap();

        let mut imported = new_extraction(user_id, content, serde_json::json!({}));
        imported.source_url = Some("https://tech.example.com/article".to_string());
        store.upsert_extraction(imported).unwrap();

        let records = store.extractions_for_user(user_id).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].source_url.as_deref(),
            Some("https://tech.example.com/article")
        );
    }

    #[test]
    fn test_same_content_different_users_are_distinct() {
        let (mut store, alice_id) = store_with_user();
        let bob_id = store.add_user("bob", None).unwrap().id;
        let content = "Shared article.";

        store
            .upsert_extraction(new_extraction(alice_id, content, serde_json::json!({})))
            .unwrap();
        store
            .upsert_extraction(new_extraction(bob_id, content, serde_json::json!({})))
            .unwrap();

        assert_eq!(store.extractions_for_user(alice_id).unwrap().len(), 1);
        assert_eq!(store.extractions_for_user(bob_id).unwrap().len(), 1);
    }

    #[test]
    fn test_listing_is_newest_first() {
        let (mut store, user_id) = store_with_user();

        for i in 0..3 {
            store
                .upsert_extraction(new_extraction(
                    user_id,
                    &format!("article {}", i),
                    serde_json::json!({"n": i}),
                ))
                .unwrap();
        }

        let records = store.extractions_for_user(user_id).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].extracted_data["n"], 2);
        assert_eq!(records[2].extracted_data["n"], 0);
    }

    #[test]
    fn test_upsert_requires_existing_user() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let result = store.upsert_extraction(new_extraction(42, "text", serde_json::json!({})));
        assert!(matches!(result, Err(StoreError::UserNotFound(_))));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fundwire.db");

        let user_id = {
            let mut store = SqliteStore::new(&path).unwrap();
            let user = store.add_user("alice", None).unwrap();
            store
                .upsert_extraction(new_extraction(
                    user.id,
                    "persisted article",
                    serde_json::json!({"Montant": "1M"}),
                ))
                .unwrap();
            user.id
        };

        let store = SqliteStore::new(&path).unwrap();
        let records = store.extractions_for_user(user_id).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_content, "persisted article");
    }
}
