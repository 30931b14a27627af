//! Fundwire Batch Runner
//!
//! Drives the extraction pipeline over many articles: a pending directory of
//! `.txt` files or a CSV with a content column. Failures are isolated per
//! item, so one bad article never aborts the batch. Successfully processed
//! files are moved to a processed directory, which makes directory runs
//! resumable across restarts.
//!
//! # Architecture
//!
//! ```text
//! source (dir | csv) → per item: extract → fingerprint → upsert → report
//! ```

#![warn(missing_docs)]

mod runner;

use thiserror::Error;

pub use runner::{BatchRunner, CONTENT_COLUMNS};

/// Errors that abort a whole batch run.
///
/// Per-item extraction and persistence failures are *not* errors at this
/// level; they are counted in the report and the run continues.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Filesystem error on the source or processed directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV file could not be opened or read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV has no recognized content column
    #[error("no content column found; available columns: {available}")]
    MissingContentColumn {
        /// Header names present in the file
        available: String,
    },
}

/// Aggregate counts for one batch run.
///
/// `processed` counts items that were attempted; empty items are skipped
/// before counting, so `processed == succeeded + failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Items attempted
    pub processed: usize,
    /// Items extracted and saved
    pub succeeded: usize,
    /// Items that failed extraction or persistence
    pub failed: usize,
}
