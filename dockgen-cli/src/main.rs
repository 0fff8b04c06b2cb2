//! DockGen CLI
//!
//! Command-line front end for the Dockerfile generation service: submit a
//! repository, watch the generation, save or push the result.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dockgen")]
#[command(about = "Generate Dockerfiles for GitHub repositories", long_about = None)]
struct Cli {
    /// Generation service URL
    #[arg(long, env = "DOCKGEN_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.api_url)?;

    handle_command(cli.command, &config).await
}
