//! Output formatting for the CLI.
//!
//! Extraction payloads are schema-free, so every field read here is
//! defensive: missing keys render as "N/A" and both historical investor
//! shapes (a single `Investisseurs` list and flat `Investisseur 1..13`
//! columns) are understood.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use fundwire_batch::BatchReport;
use fundwire_domain::{ExtractionRecord, User};
use fundwire_wordpress::PostPage;
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format extraction records.
    pub fn format_records(&self, records: &[ExtractionRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Quiet => Ok(records
                .iter()
                .map(|r| r.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(self.records_table(records)),
        }
    }

    fn records_table(&self, records: &[ExtractionRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No extractions found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "ID", "Date", "Company", "Sector", "Amount", "Round", "Investors", "Source",
        ]);

        for record in records {
            let data = &record.extracted_data;
            builder.push_record([
                record.id.to_string(),
                record.created_at.format("%Y-%m-%d %H:%M").to_string(),
                field(data, "Nom_start-up"),
                field(data, "Secteur_start-up"),
                field(data, "Montant"),
                field(data, "Tour"),
                investors(data),
                record.source_url.clone().unwrap_or_else(|| "N/A".into()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format one page of WordPress posts.
    pub fn format_posts(&self, page: &PostPage) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&page.posts)?),
            OutputFormat::Quiet => Ok(page
                .posts
                .iter()
                .map(|p| p.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if page.posts.is_empty() {
                    return Ok(self.colorize("No posts found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Date", "Title", "Author", "Link"]);
                for post in &page.posts {
                    builder.push_record([
                        post.id.to_string(),
                        post.date.clone().unwrap_or_else(|| "N/A".into()),
                        post.title.clone(),
                        post.author.clone(),
                        post.link.clone().unwrap_or_else(|| "N/A".into()),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(format!(
                    "{}\nPage {}/{}, {} posts total",
                    table, page.current_page, page.total_pages, page.total_posts
                ))
            }
        }
    }

    /// Format a user's details.
    pub fn format_user(&self, user: &User) -> String {
        let prompt = match &user.custom_system_prompt {
            Some(p) if !p.trim().is_empty() => format!("custom ({} chars)", p.len()),
            _ => "platform default".to_string(),
        };
        format!(
            "{} (id {})\n  created: {}\n  system prompt: {}",
            user.username,
            user.id,
            user.created_at.format("%Y-%m-%d %H:%M"),
            prompt
        )
    }

    /// Format a batch tally.
    pub fn report_summary(&self, report: &BatchReport) -> String {
        let summary = format!(
            "{} processed, {} succeeded, {} failed",
            report.processed, report.succeeded, report.failed
        );
        if report.failed > 0 {
            self.colorize(&summary, "yellow")
        } else {
            self.colorize(&summary, "green")
        }
    }

    /// A success status line.
    pub fn success_line(&self, message: &str) -> String {
        self.colorize(message, "green")
    }

    /// An error status line.
    pub fn error_line(&self, message: &str) -> String {
        self.colorize(message, "red")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Read an optional field, rendering absent or blank values as "N/A".
fn field(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Collect investor names from either historical payload shape.
fn investors(data: &Value) -> String {
    // Current shape: a single list (or comma string) under "Investisseurs"
    match data.get("Investisseurs") {
        Some(Value::Array(items)) => {
            let names: Vec<&str> = items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if !names.is_empty() {
                return names.join(", ");
            }
        }
        Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
        _ => {}
    }

    // Legacy shape: flat "Investisseur 1".."Investisseur 13" columns
    let names: Vec<&str> = (1..=13)
        .filter_map(|i| data.get(format!("Investisseur {}", i)))
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() {
        "N/A".to_string()
    } else {
        names.join(", ")
    }
}
