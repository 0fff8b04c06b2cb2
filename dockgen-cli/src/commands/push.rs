//! Push command handler

use anyhow::{Context, Result};
use colored::*;
use tracing::info;

use super::parse_user_job_id;
use crate::config::Config;

/// Commit the generated Dockerfile to the originating repository
pub async fn push(config: &Config, id: &str, message: &str) -> Result<()> {
    let job_id = parse_user_job_id(id)?;
    let client = config.client()?;

    println!("{}", "Pushing Dockerfile to repository...".dimmed());

    let pushed = client
        .push_dockerfile(&job_id, message)
        .await
        .context("Failed to push Dockerfile to repository")?;

    info!("Dockerfile for generation {} pushed", job_id);
    println!("{} Dockerfile pushed to repository", "✓".green());
    if let Some(detail) = pushed.message {
        println!("  {}", detail.dimmed());
    }

    Ok(())
}
