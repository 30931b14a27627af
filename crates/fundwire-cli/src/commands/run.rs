//! Run command implementation: batch over a CSV file or the pending directory.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompt::resolve_system_prompt;
use fundwire_batch::BatchRunner;
use fundwire_extractor::ExtractionClient;
use fundwire_llm::ChatClient;
use fundwire_store::SqliteStore;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = SqliteStore::new(&config.database_path)?;

    let user = store
        .user_by_name(&args.user)?
        .ok_or_else(|| CliError::UnknownUser(args.user.clone()))?;
    let system_prompt = resolve_system_prompt(&user, &config.system_prompt_file)?;

    let client = ExtractionClient::new(ChatClient::new(config.llm.clone()));
    let mut runner = BatchRunner::new(client, store, user.id, system_prompt);

    let report = match &args.csv {
        Some(path) => {
            println!("Processing CSV file: {}", path.display());
            runner.run_csv(path).await?
        }
        None => {
            println!(
                "Processing pending directory: {}",
                config.pending_dir.display()
            );
            runner
                .run_dir(&config.pending_dir, &config.processed_dir)
                .await?
        }
    };

    // Partial failure is reported, not fatal: the exit code stays 0 and the
    // failed items remain available for a future run.
    println!("{}", formatter.report_summary(&report));
    Ok(())
}
