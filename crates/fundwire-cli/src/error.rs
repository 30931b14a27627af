//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The named user is not registered
    #[error("unknown user '{0}'; create it first with `fundwire user add {0}`")]
    UnknownUser(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store error
    #[error("store error: {0}")]
    Store(#[from] fundwire_store::StoreError),

    /// Extraction error
    #[error("extraction failed: {0}")]
    Extraction(#[from] fundwire_extractor::ExtractorError),

    /// Batch error
    #[error("batch error: {0}")]
    Batch(#[from] fundwire_batch::BatchError),

    /// WordPress API error
    #[error("WordPress error: {0}")]
    WordPress(#[from] fundwire_wordpress::WordPressError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
