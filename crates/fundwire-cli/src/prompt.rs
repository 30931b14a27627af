//! System prompt resolution.
//!
//! A user's stored override wins; otherwise the platform prompt file is
//! read from disk. The extraction client is indifferent to provenance; it
//! receives a resolved string.

use crate::error::{CliError, Result};
use fundwire_domain::User;
use std::fs;
use std::path::Path;
use tracing::info;

/// Resolve the system prompt for a user.
pub fn resolve_system_prompt(user: &User, default_file: &Path) -> Result<String> {
    if let Some(prompt) = &user.custom_system_prompt {
        if !prompt.trim().is_empty() {
            info!(user = %user.username, "using custom system prompt");
            return Ok(prompt.clone());
        }
    }

    let prompt = fs::read_to_string(default_file).map_err(|_| {
        CliError::Config(format!(
            "system prompt file '{}' not found",
            default_file.display()
        ))
    })?;

    if prompt.trim().is_empty() {
        return Err(CliError::Config(format!(
            "system prompt file '{}' is empty",
            default_file.display()
        )));
    }

    info!(user = %user.username, "using default system prompt");
    Ok(prompt)
}
