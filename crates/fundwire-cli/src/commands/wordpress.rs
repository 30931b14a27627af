//! WordPress command implementation: probe, list, and import posts.

use crate::cli::{WordpressAction, WordpressArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompt::resolve_system_prompt;
use fundwire_batch::BatchReport;
use fundwire_domain::{fingerprint, NewExtraction};
use fundwire_extractor::ExtractionClient;
use fundwire_llm::ChatClient;
use fundwire_store::SqliteStore;
use fundwire_wordpress::plain_text;
use tracing::{info, warn};

/// Execute a WordPress action.
pub async fn execute_wordpress(
    args: WordpressArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let connector = config.wordpress_connector()?;

    match args.action {
        WordpressAction::Check { subdomain } => {
            let check = connector.check_connection(&subdomain).await;
            let line = format!("{} ({})", check.message, check.url);
            if check.success {
                println!("{}", formatter.success_line(&line));
            } else {
                println!("{}", formatter.error_line(&line));
            }
        }

        WordpressAction::Categories { subdomain } => {
            let categories = connector.categories(&subdomain).await?;
            if categories.is_empty() {
                println!("No categories found.");
            }
            for category in categories {
                println!("{:>6}  {} ({} posts)", category.id, category.name, category.count);
            }
        }

        WordpressAction::Post { subdomain, id } => {
            let post = connector.post_by_id(&subdomain, id).await?;
            println!("{}", serde_json::to_string_pretty(&post)?);
        }

        WordpressAction::Posts {
            subdomain,
            filters,
            page,
        } => {
            let page = connector.posts(&subdomain, &filters.to_query(page)).await?;
            println!("{}", formatter.format_posts(&page)?);
        }

        WordpressAction::Import {
            subdomain,
            user,
            filters,
            pages,
        } => {
            let mut store = SqliteStore::new(&config.database_path)?;
            let user = store
                .user_by_name(&user)?
                .ok_or_else(|| CliError::UnknownUser(user.clone()))?;
            let system_prompt = resolve_system_prompt(&user, &config.system_prompt_file)?;
            let client = ExtractionClient::new(ChatClient::new(config.llm.clone()));

            let mut report = BatchReport::default();

            for page_number in 1..=pages {
                let page = connector
                    .posts(&subdomain, &filters.to_query(page_number))
                    .await?;
                info!(
                    page = page_number,
                    posts = page.posts.len(),
                    "imported WordPress page"
                );

                for post in &page.posts {
                    let article_text = plain_text(&post.content);
                    if article_text.trim().is_empty() {
                        info!(post = post.id, "empty post content, skipped");
                        continue;
                    }

                    report.processed += 1;
                    println!("Processing post {}: {}", post.id, post.title);

                    match client.extract(&article_text, &system_prompt).await {
                        Ok(fields) => {
                            let saved = store.upsert_extraction(NewExtraction {
                                user_id: user.id,
                                content_hash: fingerprint(&article_text),
                                original_content: article_text,
                                extracted_data: serde_json::Value::Object(fields),
                                source_url: post.link.clone(),
                            });
                            match saved {
                                Ok(()) => report.succeeded += 1,
                                Err(e) => {
                                    warn!(post = post.id, error = %e, "save failed");
                                    report.failed += 1;
                                }
                            }
                        }
                        Err(e) => {
                            warn!(post = post.id, error = %e, "extraction failed");
                            report.failed += 1;
                        }
                    }
                }

                if page_number >= page.total_pages {
                    break;
                }
            }

            println!("{}", formatter.report_summary(&report));
        }
    }

    Ok(())
}
