//! History command implementation.

use crate::cli::HistoryArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fundwire_store::SqliteStore;

/// Execute the history command.
pub async fn execute_history(
    args: HistoryArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let store = SqliteStore::new(&config.database_path)?;
    let user = store
        .user_by_name(&args.user)?
        .ok_or_else(|| CliError::UnknownUser(args.user.clone()))?;

    let mut records = store.extractions_for_user(user.id)?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    println!("{}", formatter.format_records(&records)?);
    Ok(())
}
