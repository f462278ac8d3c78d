use anyhow::Result;
use clap::Parser;
use ucb_client::cli::{handle_command, Cli};
use ucb_client::config::Config;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays parseable command output.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    config.ensure_directories().await?;

    handle_command(cli, config).await
}
