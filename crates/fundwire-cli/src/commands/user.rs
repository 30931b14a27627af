//! User management command implementation.

use crate::cli::{UserAction, UserArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fundwire_store::SqliteStore;
use std::fs;

/// Execute a user management action.
pub async fn execute_user(args: UserArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut store = SqliteStore::new(&config.database_path)?;

    match args.action {
        UserAction::Add { name } => {
            let user = store.add_user(&name, None)?;
            println!(
                "{}",
                formatter.success_line(&format!("Created user '{}' (id {}).", user.username, user.id))
            );
        }

        UserAction::Show { name } => {
            let user = store
                .user_by_name(&name)?
                .ok_or(CliError::UnknownUser(name))?;
            println!("{}", formatter.format_user(&user));
        }

        UserAction::SetPrompt { name, file, clear } => {
            let user = store
                .user_by_name(&name)?
                .ok_or_else(|| CliError::UnknownUser(name.clone()))?;

            match (file, clear) {
                (Some(_), true) => {
                    return Err(CliError::InvalidInput(
                        "--file and --clear are mutually exclusive".to_string(),
                    ));
                }
                (Some(path), false) => {
                    let prompt = fs::read_to_string(&path)?;
                    if prompt.trim().is_empty() {
                        return Err(CliError::InvalidInput(format!(
                            "prompt file '{}' is empty",
                            path.display()
                        )));
                    }
                    store.update_user_prompt(user.id, Some(&prompt))?;
                    println!(
                        "{}",
                        formatter.success_line(&format!("Custom prompt set for '{}'.", name))
                    );
                }
                (None, true) => {
                    store.update_user_prompt(user.id, None)?;
                    println!(
                        "{}",
                        formatter.success_line(&format!(
                            "Custom prompt cleared for '{}'; the platform default applies.",
                            name
                        ))
                    );
                }
                (None, false) => {
                    return Err(CliError::InvalidInput(
                        "specify either --file or --clear".to_string(),
                    ));
                }
            }
        }
    }

    Ok(())
}
