//! Extract command implementation: one article from a file or stdin.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompt::resolve_system_prompt;
use fundwire_domain::{fingerprint, NewExtraction};
use fundwire_extractor::ExtractionClient;
use fundwire_llm::ChatClient;
use fundwire_store::SqliteStore;
use std::fs;
use std::io::{self, Read};

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let article_text = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = &args.file {
        fs::read_to_string(path)?
    } else {
        return Err(CliError::InvalidInput(
            "specify either --file or --stdin".to_string(),
        ));
    };

    if article_text.trim().is_empty() {
        return Err(CliError::InvalidInput("article text is empty".to_string()));
    }

    let mut store = SqliteStore::new(&config.database_path)?;
    let user = store
        .user_by_name(&args.user)?
        .ok_or_else(|| CliError::UnknownUser(args.user.clone()))?;
    let system_prompt = resolve_system_prompt(&user, &config.system_prompt_file)?;

    let client = ExtractionClient::new(ChatClient::new(config.llm.clone()));
    let fields = client.extract(&article_text, &system_prompt).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(fields.clone()))?
    );

    store.upsert_extraction(NewExtraction {
        user_id: user.id,
        content_hash: fingerprint(&article_text),
        original_content: article_text,
        extracted_data: serde_json::Value::Object(fields),
        source_url: args.source_url.filter(|url| !url.trim().is_empty()),
    })?;

    println!("{}", formatter.success_line("Saved to extraction history."));
    Ok(())
}
