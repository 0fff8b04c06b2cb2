//! Status command handler

use anyhow::{Context, Result};

use super::parse_user_job_id;
use crate::config::Config;
use crate::output;

/// Query and display the status of a generation once
pub async fn show_status(config: &Config, id: &str, json: bool) -> Result<()> {
    let job_id = parse_user_job_id(id)?;
    let client = config.client()?;

    let generation = client
        .get_generation_status(&job_id)
        .await
        .with_context(|| format!("Failed to fetch status of generation {}", job_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&generation)?);
    } else {
        output::print_generation(&job_id, &generation);
    }

    Ok(())
}
