use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pr_snapshot::config::{ConfigOverrides, SnapshotConfig};
use pr_snapshot::github::GitHubClient;
use pr_snapshot::services::{
    EntityNormalizer, ResponseLog, RunOutcome, RunSummary, SnapshotAssembler,
};
use pr_snapshot::types::IssueLinkExtractor;

#[derive(Parser)]
#[command(name = "pr-snapshot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Snapshot the open pull requests of a GitHub repository into one JSON file for a static dashboard"
)]
struct Cli {
    /// TOML config file (default: <user config dir>/pr-snapshot/config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Repository to snapshot, as owner/name or a repository URL (default: godotengine/godot)
    #[arg(short, long)]
    repository: Option<String>,
    /// Host used to resolve issue references in pull request descriptions (default: github.com)
    #[arg(long)]
    host: Option<String>,
    /// GraphQL endpoint (default: derived from the host)
    #[arg(long)]
    api_url: Option<String>,
    /// Snapshot output path (default: out/data.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Directory for raw API responses (default: logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Do not persist raw API responses
    #[arg(long)]
    no_response_log: bool,
    /// GitHub token (can also be set via GRAPHQL_TOKEN or GITHUB_TOKEN environment variables)
    #[arg(long)]
    github_token: Option<String>,
    /// Request timeout in seconds for GitHub API calls (default: 30 seconds)
    #[arg(long)]
    request_timeout: Option<u64>,
    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let directive = if cli.debug {
        "pr_snapshot=debug"
    } else {
        "pr_snapshot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let overrides = ConfigOverrides {
        repository: cli.repository,
        host: cli.host,
        api_url: cli.api_url,
        output_path: cli.output,
        response_log_dir: cli.log_dir,
        no_response_log: cli.no_response_log,
        request_timeout_secs: cli.request_timeout,
        github_token: cli.github_token,
    };
    let config = SnapshotConfig::load(cli.config.as_deref(), overrides)?;
    tracing::debug!("Configuration: {:?}", config);

    let client = GitHubClient::new(
        config.api_url.clone(),
        config.github_token.clone(),
        Some(config.request_timeout),
    )?;
    let extractor = IssueLinkExtractor::new(&config.host, &config.repository_id)?;
    let response_log = ResponseLog::new(config.response_log_dir.clone());
    let assembler = SnapshotAssembler::new(
        &client,
        &config.repository_id,
        EntityNormalizer::new(extractor),
        &response_log,
    );

    info!("Snapshotting open pull requests of {}", config.repository_id);
    let outcome = match assembler.run(&config.output_path).await {
        Ok(summary) => {
            log_summary(&summary);
            RunOutcome::Success
        }
        Err(e) => {
            let outcome = e.outcome();
            error!("Snapshot run ended with {}: {}", outcome, e);
            outcome
        }
    };

    Ok(outcome.into())
}

fn log_summary(summary: &RunSummary) {
    info!(
        "Saved {} pull requests from {} pages ({} authors, {} teams, {} reviewers) to {}",
        summary.pull_count,
        summary.pages_fetched,
        summary.author_count,
        summary.team_count,
        summary.reviewer_count,
        summary.output_path.display()
    );
}
