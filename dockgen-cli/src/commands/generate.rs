//! Generate and watch command handlers
//!
//! `generate` submits a repository and then watches the resulting job;
//! `watch` attaches to a job that was submitted earlier. Both run one poll
//! session, print its progress, and stop it on Ctrl-C.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::*;
use dockgen_client::GenerationClient;
use dockgen_core::domain::job::JobId;
use dockgen_core::dto::generation::GenerateRequest;
use dockgen_poller::JobPoller;
use tracing::{debug, info};

use super::parse_user_job_id;
use crate::config::Config;
use crate::output;

/// How long a stopped session may take to wind down before it is abandoned
const STOP_GRACE: Duration = Duration::from_millis(500);

/// Submit a generation request and wait for it to finish
pub async fn generate(
    config: &Config,
    repo_url: &str,
    token: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    if repo_url.trim().is_empty() || token.trim().is_empty() {
        anyhow::bail!("Please provide both a GitHub URL and a personal access token");
    }

    let client = Arc::new(config.client()?);

    let accepted = client
        .submit_generation(&GenerateRequest {
            github_url: repo_url.trim().to_string(),
            github_token: token.trim().to_string(),
        })
        .await
        .context("Failed to submit generation request")?;

    info!("Generation accepted with id {}", accepted.generation_id);
    println!(
        "{} Generation started: {}",
        "✓".green(),
        accepted.generation_id.cyan()
    );

    let job_id = server_job_id(&accepted.generation_id)?;
    watch_job(config, client, &job_id, output).await
}

/// Watch an existing generation
pub async fn watch(config: &Config, id: &str, output: Option<PathBuf>) -> Result<()> {
    let job_id = parse_user_job_id(id)?;
    let client = Arc::new(config.client()?);
    watch_job(config, client, &job_id, output).await
}

fn server_job_id(raw: &str) -> Result<JobId> {
    JobId::parse(raw).context("Invalid generation ID received from server")
}

async fn watch_job(
    config: &Config,
    client: Arc<GenerationClient>,
    job_id: &JobId,
    output: Option<PathBuf>,
) -> Result<()> {
    let poller = JobPoller::new(config.poll.clone(), client);
    let session = poller.start(job_id)?;

    println!("{}", "Waiting for the generation to finish (Ctrl-C to stop)...".dimmed());

    let mut progress = session.subscribe();
    let mut printer = output::ProgressPrinter::default();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut stopped = false;

    loop {
        tokio::select! {
            changed = progress.changed() => {
                if changed.is_err() {
                    debug!("Progress channel closed");
                    break;
                }
                let update = progress.borrow_and_update().clone();
                printer.print(&update);
                if update.terminated {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                println!();
                println!("{}", "Stopping generation...".yellow());
                stopped = true;
                break;
            }
        }
    }

    let outcome = if stopped {
        session.cancel_and_wait(STOP_GRACE).await?
    } else {
        session.wait().await?
    };
    output::print_outcome(&outcome);

    if let (Some(path), Some(artifact)) = (output.as_deref(), outcome.snapshot.artifact.as_deref()) {
        write_dockerfile(path, artifact).await?;
    }

    match outcome.into_result() {
        Ok(_) => Ok(()),
        Err(e) if e.is_cancelled() => {
            println!("{}", "Generation stopped.".dimmed());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn write_dockerfile(path: &Path, artifact: &str) -> Result<()> {
    tokio::fs::write(path, artifact)
        .await
        .with_context(|| format!("Failed to write Dockerfile to {}", path.display()))?;

    println!(
        "{} Dockerfile written to {}",
        "✓".green(),
        path.display().to_string().cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_job_id_is_used_verbatim() {
        let id = server_job_id("abcdefghij0123456789 ").unwrap();
        assert_eq!(id.as_str(), "abcdefghij0123456789 ");
    }

    #[test]
    fn test_server_job_id_error_names_the_server() {
        let err = server_job_id("abc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid generation ID received from server");
    }
}
