//! Batch orchestration over directories and CSV files

use crate::{BatchError, BatchReport};
use fundwire_domain::{fingerprint, ChatProvider, ExtractionStore, NewExtraction};
use fundwire_extractor::ExtractionClient;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Accepted CSV header names for the article column, in preference order.
pub const CONTENT_COLUMNS: [&str; 5] = ["content", "article", "text", "texte", "contenu"];

/// Runs the extraction pipeline over a batch source for one user.
///
/// Generic over the provider and store seams so tests can substitute fakes;
/// items are processed strictly one at a time.
pub struct BatchRunner<P, S>
where
    P: ChatProvider + Send + Sync,
    S: ExtractionStore,
{
    client: ExtractionClient<P>,
    store: S,
    user_id: i64,
    system_prompt: String,
}

impl<P, S> BatchRunner<P, S>
where
    P: ChatProvider + Send + Sync,
    S: ExtractionStore,
{
    /// Create a runner for one user with a resolved system prompt.
    pub fn new(
        client: ExtractionClient<P>,
        store: S,
        user_id: i64,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            user_id,
            system_prompt: system_prompt.into(),
        }
    }

    /// The underlying store, for inspection after a run.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process every `.txt` file in `pending`, moving each to `processed`
    /// on success.
    ///
    /// The move is the commit marker: files still in `pending` after a run
    /// (failed or never attempted) are picked up by the next run, and the
    /// idempotent upsert makes re-processing harmless.
    pub async fn run_dir(
        &mut self,
        pending: &Path,
        processed: &Path,
    ) -> Result<BatchReport, BatchError> {
        fs::create_dir_all(processed)?;

        let mut files: Vec<PathBuf> = fs::read_dir(pending)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();

        if files.is_empty() {
            info!(pending = %pending.display(), "no pending files to process");
            return Ok(BatchReport::default());
        }

        let mut report = BatchReport::default();

        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!(file = %name, "processing file");

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %name, error = %e, "failed to read file");
                    report.processed += 1;
                    report.failed += 1;
                    continue;
                }
            };

            if content.trim().is_empty() {
                info!(file = %name, "empty file, skipped");
                continue;
            }

            report.processed += 1;
            match self.process_article(&content, None).await {
                Ok(()) => {
                    report.succeeded += 1;
                    if let Err(e) = fs::rename(&path, processed.join(&name)) {
                        // Already upserted; the next run will redo this file
                        // and the upsert will overwrite in place.
                        warn!(file = %name, error = %e, "could not move processed file");
                    }
                }
                Err(message) => {
                    warn!(file = %name, %message, "extraction failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed,
            "directory batch finished"
        );
        Ok(report)
    }

    /// Process every row of a CSV file.
    ///
    /// The content column is auto-detected among `CONTENT_COLUMNS`; rows
    /// with empty content are skipped.
    pub async fn run_csv(&mut self, path: &Path) -> Result<BatchReport, BatchError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let column = detect_content_column(&headers).ok_or_else(|| {
            BatchError::MissingContentColumn {
                available: headers.iter().collect::<Vec<_>>().join(", "),
            }
        })?;
        info!(column = headers.get(column).unwrap_or(""), "detected content column");

        let mut report = BatchReport::default();

        for (row, result) in reader.records().enumerate() {
            // Header is line 1
            let line = row + 2;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(line, error = %e, "unreadable CSV row");
                    report.processed += 1;
                    report.failed += 1;
                    continue;
                }
            };

            let content = record.get(column).unwrap_or("").trim().to_string();
            if content.is_empty() {
                info!(line, "empty content, skipped");
                continue;
            }

            report.processed += 1;
            match self.process_article(&content, None).await {
                Ok(()) => report.succeeded += 1,
                Err(message) => {
                    warn!(line, %message, "extraction failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed,
            "CSV batch finished"
        );
        Ok(report)
    }

    /// Extract one article and persist the result.
    ///
    /// Returns a diagnostic message on failure; the caller decides how to
    /// count it. Transport and malformed-output failures are treated
    /// identically here.
    async fn process_article(
        &mut self,
        content: &str,
        source_url: Option<&str>,
    ) -> Result<(), String> {
        let fields = self
            .client
            .extract(content, &self.system_prompt)
            .await
            .map_err(|e| e.to_string())?;

        self.store
            .upsert_extraction(NewExtraction {
                user_id: self.user_id,
                original_content: content.to_string(),
                extracted_data: serde_json::Value::Object(fields),
                content_hash: fingerprint(content),
                source_url: source_url.map(String::from),
            })
            .map_err(|e| format!("save failed: {}", e))
    }
}

/// Index of the first accepted content column in `headers`, if any.
fn detect_content_column(headers: &csv::StringRecord) -> Option<usize> {
    CONTENT_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
}
