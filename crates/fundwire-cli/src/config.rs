//! Configuration management for the CLI.
//!
//! Settings load from `~/.fundwire/config.toml` (or an explicit path) and
//! are then overridden by environment variables: `LLM_API_URL`,
//! `LLM_API_KEY`, and `FUNDWIRE_DB`. The resolved struct is built once in
//! `main` and injected into every component; nothing reads configuration
//! ambiently after startup.

use crate::error::{CliError, Result};
use fundwire_llm::LlmConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database path
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Default system prompt file, used when a user has no override
    #[serde(default = "default_prompt_file")]
    pub system_prompt_file: PathBuf,

    /// Directory scanned for pending `.txt` articles
    #[serde(default = "default_pending_dir")]
    pub pending_dir: PathBuf,

    /// Directory successful files are moved into
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,

    /// LLM endpoint settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// WordPress multisite settings
    #[serde(default)]
    pub wordpress: WordPressSettings,
}

/// Connection settings for the WordPress collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordPressSettings {
    /// Base domain of the multisite (e.g. "example.com")
    #[serde(default)]
    pub base_domain: Option<String>,

    /// Sub-directory multisite instead of sub-domains
    #[serde(default)]
    pub use_subdirectories: bool,

    /// Basic-auth user, for non-public posts
    #[serde(default)]
    pub auth_user: Option<String>,

    /// Basic-auth password (a WordPress Application Password)
    #[serde(default)]
    pub auth_password: Option<String>,
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("could not find home directory".into()))?;
        Ok(home.join(".fundwire").join("config.toml"))
    }

    /// Load configuration, then apply environment overrides.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file
    /// is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => path.to_path_buf(),
            None => Self::path()?,
        };

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else if explicit_path.is_some() {
            return Err(CliError::Config(format!(
                "configuration file '{}' not found",
                path.display()
            )));
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Apply `FUNDWIRE_DB`, `LLM_API_URL`, and `LLM_API_KEY`.
    fn apply_env_overrides(&mut self) {
        if let Ok(db) = std::env::var("FUNDWIRE_DB") {
            if !db.is_empty() {
                self.database_path = PathBuf::from(db);
            }
        }
        self.llm = std::mem::take(&mut self.llm).with_env_overrides();
    }

    /// Build a WordPress connector from the configured settings.
    pub fn wordpress_connector(&self) -> Result<fundwire_wordpress::WordPressConnector> {
        let base_domain = self.wordpress.base_domain.as_deref().ok_or_else(|| {
            CliError::Config(
                "wordpress.base_domain is not configured; set it in config.toml".into(),
            )
        })?;

        let mut connector = fundwire_wordpress::WordPressConnector::new(base_domain)
            .with_subdirectories(self.wordpress.use_subdirectories);

        if let (Some(user), Some(password)) = (
            self.wordpress.auth_user.as_deref(),
            self.wordpress.auth_password.as_deref(),
        ) {
            connector = connector.with_auth(user, password);
        }

        Ok(connector)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            system_prompt_file: default_prompt_file(),
            pending_dir: default_pending_dir(),
            processed_dir: default_processed_dir(),
            llm: LlmConfig::default(),
            wordpress: WordPressSettings::default(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("fundwire.db")
}

fn default_prompt_file() -> PathBuf {
    PathBuf::from("system_prompt.txt")
}

fn default_pending_dir() -> PathBuf {
    PathBuf::from("pending")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("processed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database_path, PathBuf::from("fundwire.db"));
        assert_eq!(config.system_prompt_file, PathBuf::from("system_prompt.txt"));
        assert!(config.wordpress.base_domain.is_none());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
database_path = "custom.db"

[llm]
endpoint = "http://127.0.0.1:9999/v1/chat/completions"

[wordpress]
base_domain = "example.com"
use_subdirectories = true
"#
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("custom.db"));
        assert_eq!(
            config.llm.endpoint,
            "http://127.0.0.1:9999/v1/chat/completions"
        );
        assert!(config.wordpress.use_subdirectories);
        // Untouched fields keep their defaults
        assert_eq!(config.pending_dir, PathBuf::from("pending"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/fundwire.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_connector_requires_base_domain() {
        let config = Config::default();
        assert!(config.wordpress_connector().is_err());

        let mut configured = Config::default();
        configured.wordpress.base_domain = Some("example.com".into());
        assert!(configured.wordpress_connector().is_ok());
    }
}
