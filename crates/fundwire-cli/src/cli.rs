//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fundwire CLI - Extract structured fundraising data from news articles.
#[derive(Debug, Parser)]
#[command(name = "fundwire")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Batch-process a CSV file or the pending directory
    Run(RunArgs),

    /// Extract a single article from a file or stdin
    Extract(ExtractArgs),

    /// Show a user's extraction history, newest first
    History(HistoryArgs),

    /// Manage users and their prompt overrides
    User(UserArgs),

    /// Browse and import articles from a WordPress multisite
    Wordpress(WordpressArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// User the extractions belong to
    #[arg(short, long)]
    pub user: String,

    /// CSV file to process; without it the pending directory is used
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// User the extraction belongs to
    #[arg(short, long)]
    pub user: String,

    /// File holding the article text
    #[arg(short = 'F', long)]
    pub file: Option<PathBuf>,

    /// Read the article text from stdin
    #[arg(long)]
    pub stdin: bool,

    /// URL the article came from
    #[arg(long)]
    pub source_url: Option<String>,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// User whose history to show
    #[arg(short, long)]
    pub user: String,

    /// Maximum number of records to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for user management.
#[derive(Debug, Parser)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

/// User management actions.
#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// Register a new user
    Add {
        /// Login name
        name: String,
    },

    /// Show a user's details
    Show {
        /// Login name
        name: String,
    },

    /// Set or clear a user's system prompt override
    SetPrompt {
        /// Login name
        name: String,

        /// File holding the new prompt
        #[arg(short = 'F', long)]
        file: Option<PathBuf>,

        /// Remove the override, falling back to the platform default
        #[arg(long)]
        clear: bool,
    },
}

/// Arguments for the WordPress surface.
#[derive(Debug, Parser)]
pub struct WordpressArgs {
    #[command(subcommand)]
    pub action: WordpressAction,
}

/// WordPress actions.
#[derive(Debug, Subcommand)]
pub enum WordpressAction {
    /// Probe a sub-site's REST API
    Check {
        /// Sub-site (vertical) to probe
        subdomain: String,
    },

    /// List the categories available on a sub-site
    Categories {
        /// Sub-site (vertical) to query
        subdomain: String,
    },

    /// Show a single post
    Post {
        /// Sub-site (vertical) the post lives on
        subdomain: String,

        /// Post id
        id: i64,
    },

    /// List posts from a sub-site
    Posts {
        /// Sub-site (vertical) to query
        subdomain: String,

        #[command(flatten)]
        filters: PostFilters,

        /// Page to fetch
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Run fetched posts through the extraction pipeline
    Import {
        /// Sub-site (vertical) to import from
        subdomain: String,

        /// User the extractions belong to
        #[arg(short, long)]
        user: String,

        #[command(flatten)]
        filters: PostFilters,

        /// Number of pages to import, starting at page 1
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
}

/// Shared post filters.
#[derive(Debug, Parser)]
pub struct PostFilters {
    /// Posts per page (WordPress caps this at 100)
    #[arg(long, default_value_t = 20)]
    pub per_page: u32,

    /// Full-text search term
    #[arg(long)]
    pub search: Option<String>,

    /// Category id filter; repeatable
    #[arg(long = "category")]
    pub categories: Vec<i64>,

    /// Only posts published after this ISO 8601 date
    #[arg(long)]
    pub after: Option<String>,

    /// Only posts published before this ISO 8601 date
    #[arg(long)]
    pub before: Option<String>,
}

impl PostFilters {
    /// Build a connector query for one page.
    pub fn to_query(&self, page: u32) -> fundwire_wordpress::PostQuery {
        fundwire_wordpress::PostQuery {
            per_page: self.per_page,
            page,
            search: self.search.clone(),
            categories: self.categories.clone(),
            after: self.after.clone(),
            before: self.before.clone(),
        }
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_run_command_with_csv() {
        let cli = Cli::parse_from(["fundwire", "run", "--user", "alice", "--csv", "articles.csv"]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.user, "alice");
                assert_eq!(args.csv.unwrap(), PathBuf::from("articles.csv"));
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_run_command_requires_user() {
        let result = Cli::try_parse_from(["fundwire", "run"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_from_stdin() {
        let cli = Cli::parse_from(["fundwire", "extract", "--user", "alice", "--stdin"]);
        match cli.command {
            Command::Extract(args) => {
                assert!(args.stdin);
                assert!(args.file.is_none());
            }
            _ => panic!("expected Extract command"),
        }
    }

    #[test]
    fn test_user_set_prompt_clear() {
        let cli = Cli::parse_from(["fundwire", "user", "set-prompt", "alice", "--clear"]);
        match cli.command {
            Command::User(UserArgs {
                action: UserAction::SetPrompt { name, clear, file },
            }) => {
                assert_eq!(name, "alice");
                assert!(clear);
                assert!(file.is_none());
            }
            _ => panic!("expected SetPrompt action"),
        }
    }

    #[test]
    fn test_wordpress_import_filters() {
        let cli = Cli::parse_from([
            "fundwire",
            "wordpress",
            "import",
            "tech",
            "--user",
            "alice",
            "--pages",
            "3",
            "--category",
            "7",
            "--category",
            "9",
            "--search",
            "levée",
        ]);
        match cli.command {
            Command::Wordpress(WordpressArgs {
                action:
                    WordpressAction::Import {
                        subdomain,
                        user,
                        filters,
                        pages,
                    },
            }) => {
                assert_eq!(subdomain, "tech");
                assert_eq!(user, "alice");
                assert_eq!(pages, 3);
                assert_eq!(filters.categories, vec![7, 9]);
                assert_eq!(filters.search.as_deref(), Some("levée"));
                let query = filters.to_query(2);
                assert_eq!(query.page, 2);
                assert_eq!(query.per_page, 20);
            }
            _ => panic!("expected Import action"),
        }
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::parse_from(["fundwire", "--format", "json", "history", "--user", "alice"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }
}
