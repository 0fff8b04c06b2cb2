//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod generate;
mod push;
mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use dockgen_core::domain::job::JobId;
use dockgen_core::dto::generation::DEFAULT_COMMIT_MESSAGE;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a Dockerfile for a repository and wait for the result
    Generate {
        /// GitHub repository URL
        #[arg(long)]
        repo_url: String,

        /// GitHub personal access token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,

        /// Write the generated Dockerfile to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Watch an existing generation until it finishes
    Watch {
        /// Generation ID
        id: String,

        /// Write the generated Dockerfile to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the current status of a generation
    Status {
        /// Generation ID
        id: String,

        /// Print the raw status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Commit the generated Dockerfile to the repository
    Push {
        /// Generation ID
        id: String,

        /// Commit message
        #[arg(short, long, default_value = DEFAULT_COMMIT_MESSAGE)]
        message: String,
    },
}

/// Parse a generation id typed by the user
///
/// Surrounding whitespace from copy and paste is dropped here; ids issued by
/// the server are used verbatim.
fn parse_user_job_id(raw: &str) -> Result<JobId> {
    JobId::parse(raw.trim()).context("Invalid generation ID")
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate {
            repo_url,
            token,
            output,
        } => generate::generate(config, &repo_url, &token, output).await,
        Commands::Watch { id, output } => generate::watch(config, &id, output).await,
        Commands::Status { id, json } => status::show_status(config, &id, json).await,
        Commands::Push { id, message } => push::push(config, &id, &message).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_job_id_trims_input() {
        let id = parse_user_job_id("  abcdefghij0123456789\n").unwrap();
        assert_eq!(id.as_str(), "abcdefghij0123456789");
    }

    #[test]
    fn test_parse_user_job_id_reports_invalid_input() {
        let err = parse_user_job_id("   ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid generation ID");
        assert!(format!("{:#}", err).contains("job id is empty"));
    }
}
