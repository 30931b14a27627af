//! Fundwire CLI - Command-line interface for the Fundwire extraction pipeline.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod prompt;

pub use cli::{Cli, CliFormat, Command};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
