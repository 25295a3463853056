use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use package_prune::config::{ActionInputs, DEFAULT_GRAPHQL_ENDPOINT, resolve_token};
use package_prune::graphql::github::GitHubGraphQlClient;
use package_prune::runner;

/// Inputs fall back to the `INPUT_*` variables GitHub Actions sets for `with:` values.
#[derive(Parser, Debug)]
#[command(name = "package-prune")]
#[command(version, about = "Delete old, rarely downloaded package versions from a repository")]
struct Cli {
    /// Repository owner
    #[arg(long, env = "INPUT_OWNER")]
    owner: String,

    /// Repository name
    #[arg(long, env = "INPUT_REPO")]
    repo: String,

    /// Minimum age of a version's files, e.g. `30d`, `12h`, `1.5 days`
    #[arg(long, env = "INPUT_MINAGE")]
    min_age: String,

    /// Versions downloaded more often than this are kept
    #[arg(long, env = "INPUT_MAXDOWNLOADS")]
    max_downloads: Option<String>,

    /// Package type to prune (docker, npm, maven, ...)
    #[arg(long, env = "INPUT_PACKAGETYPE")]
    package_type: Option<String>,

    /// API token with package read and delete permissions
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GraphQL endpoint
    #[arg(long, env = "INPUT_ENDPOINT", default_value = DEFAULT_GRAPHQL_ENDPOINT)]
    endpoint: String,
}

impl Cli {
    fn inputs(&self) -> ActionInputs {
        ActionInputs {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            min_age: self.min_age.clone(),
            max_downloads: self.max_downloads.clone(),
            package_type: self.package_type.clone(),
        }
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn prune(cli: Cli) -> anyhow::Result<()> {
    let token = resolve_token(cli.token.clone())?;
    let settings = cli.inputs().into_settings()?;

    let client = GitHubGraphQlClient::new(&cli.endpoint, &token)
        .context("Failed to create HTTP client")?;

    runner::run(&client, &settings, chrono::Utc::now()).await?;

    Ok(())
}

/// Runs to completion, logging the failure reason of a fatal error
fn execute(cli: Cli) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(prune(cli))
        .inspect_err(|e| error!("{:#}", e))
}

fn main() -> anyhow::Result<()> {
    init_logging();
    execute(Cli::parse())
}
