//! Fundwire Domain Layer
//!
//! Core types and trait interfaces shared by every other Fundwire crate.
//!
//! ## Key Concepts
//!
//! - **Fingerprint**: SHA-256 digest of article text, used as the dedup key
//! - **ExtractionRecord**: one persisted extraction, unique per (user, fingerprint)
//! - **ChatMessage**: a role-tagged turn in an LLM conversation
//! - **Trait seams**: `ChatProvider` and `ExtractionStore` define the
//!   boundaries between the pipeline and its infrastructure; implementations
//!   live in `fundwire-llm` and `fundwire-store`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fingerprint;
pub mod message;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use fingerprint::fingerprint;
pub use message::{ChatMessage, Role};
pub use record::{ExtractedFields, ExtractionRecord, NewExtraction, User};
pub use traits::{ChatProvider, ExtractionStore};
