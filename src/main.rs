// src/main.rs
use clap::Parser;
use crt_query::cli::Cli;
use crt_query::config::Config;
use crt_query::crtsh::CrtShClient;
use crt_query::filter::DateFilter;
use crt_query::output;
use crt_query::progress::ProgressIndicator;
use crt_query::query::{run_query, QueryOptions};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments (exits before any network activity if --domain is missing)
    let cli = Cli::parse();
    cli.validate()?;

    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;

    config.apply_overrides(&cli);

    // Initialize logging; stdout is reserved for results
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let filter = DateFilter::from_args(cli.between.as_deref(), cli.days)?;
    let options = QueryOptions::new(cli.domain.clone(), filter);
    tracing::debug!("Query options: {:?}", options);

    let client = CrtShClient::new(&config.crtsh)?;
    let progress = ProgressIndicator::new(cli.should_show_progress());

    let report = run_query(&client, &options, &progress).await?;

    let handler = output::build_handler(
        cli.output_format(),
        cli.output.as_deref(),
        &config.crtsh.link_base,
    )?;
    handler.emit(&report.records).await?;
    handler.flush().await?;

    Ok(())
}
