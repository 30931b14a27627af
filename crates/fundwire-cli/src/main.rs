//! Fundwire CLI - extract structured fundraising data from news articles.

use clap::Parser;
use fundwire_cli::{commands, Cli, Command, Config, Formatter, OutputFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> fundwire_cli::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(OutputFormat::Table);
    let formatter = Formatter::new(format, !cli.no_color);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &config, &formatter).await?,
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await?,
        Command::History(args) => commands::execute_history(args, &config, &formatter).await?,
        Command::User(args) => commands::execute_user(args, &config, &formatter).await?,
        Command::Wordpress(args) => commands::execute_wordpress(args, &config, &formatter).await?,
    }

    Ok(())
}
