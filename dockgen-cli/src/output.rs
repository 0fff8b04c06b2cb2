//! Terminal output helpers

use colored::*;
use dockgen_core::domain::generation::Generation;
use dockgen_core::domain::job::{BuildStatus, JobId};
use dockgen_core::domain::snapshot::JobSnapshot;
use dockgen_poller::{PollOutcome, PollProgress, Termination};

/// Prints poll progress, skipping repeated lines
#[derive(Default)]
pub struct ProgressPrinter {
    last_status: Option<BuildStatus>,
    last_tags: Vec<String>,
}

impl ProgressPrinter {
    pub fn print(&mut self, progress: &PollProgress) {
        if let Some(error) = &progress.last_error {
            println!(
                "  {} attempt {}: {}",
                "!".yellow(),
                progress.attempt,
                error.yellow()
            );
        }

        if let Some(status) = progress.last_status {
            if self.last_status != Some(status) {
                println!("  {} status: {}", "▸".cyan(), colorize_status(status));
                self.last_status = Some(status);
            }
        }

        let tags = &progress.snapshot.detected_tags;
        if !tags.is_empty() && *tags != self.last_tags {
            println!("  {} detected stack: {}", "▸".cyan(), tags.join(", ").bold());
            self.last_tags = tags.clone();
        }
    }
}

/// Print the final result of a poll session
pub fn print_outcome(outcome: &PollOutcome) {
    println!();
    println!(
        "{} ({} attempt(s), {:.1}s)",
        describe_termination(&outcome.termination),
        outcome.attempts,
        outcome.elapsed.as_secs_f64()
    );

    print_snapshot(&outcome.snapshot);
}

/// Print a merged job snapshot
pub fn print_snapshot(snapshot: &JobSnapshot) {
    if !snapshot.detected_tags.is_empty() {
        println!("\n{}", "Tech Stack:".bold());
        for tag in &snapshot.detected_tags {
            println!("  {} {}", "•".cyan(), tag);
        }
    }

    if let Some(detail) = &snapshot.failure_detail {
        println!("\n{}", "Error:".bold());
        println!("{}", detail.red());
    }

    if let Some(artifact) = &snapshot.artifact {
        println!("\n{}", "Dockerfile:".bold());
        println!("{}", "─".repeat(80).dimmed());
        println!("{}", artifact);
        println!("{}", "─".repeat(80).dimmed());
    }
}

/// Print a single status reading
pub fn print_generation(job_id: &JobId, generation: &Generation) {
    println!("{}", "Generation Details:".bold());
    println!("  ID:         {}", job_id.to_string().cyan());
    println!("  Status:     {}", colorize_status(generation.build_status));

    if !generation.tech_stack.is_empty() {
        println!("  Tech Stack: {}", generation.tech_stack.join(", "));
    }

    if let Some(detail) = generation.failure_detail() {
        println!("\n{}", "Error:".bold());
        println!("{}", detail.red());
    }

    if let Some(artifact) = generation.artifact() {
        println!("\n{}", "Dockerfile:".bold());
        println!("{}", artifact);
    }
}

/// One-line summary of why a session stopped
pub fn describe_termination(termination: &Termination) -> String {
    match termination {
        Termination::Succeeded => "✓ Dockerfile generated".to_string(),
        Termination::ArtifactReady => "✓ Dockerfile generated (build still running)".to_string(),
        Termination::Failed { detail: Some(detail) } => format!("✗ Generation failed: {}", detail),
        Termination::Failed { detail: None } => "✗ Generation failed".to_string(),
        Termination::TimedOut => "⚠ Gave up waiting for the generation".to_string(),
        Termination::ConnectionLost(_) => {
            "✗ Connection to server lost. Please try again.".to_string()
        }
        Termination::UnrecognizedStatus(status) => {
            format!("⚠ Generation stopped with status '{}'", status)
        }
        Termination::Cancelled => "⚠ Generation stopped manually".to_string(),
    }
}

/// Colorize build status for display
fn colorize_status(status: BuildStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        BuildStatus::Pending => label.yellow(),
        BuildStatus::Building => label.cyan(),
        BuildStatus::Success => label.green(),
        BuildStatus::Error => label.red(),
        BuildStatus::Unknown => label.dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_termination() {
        assert_eq!(
            describe_termination(&Termination::Failed {
                detail: Some("no package manifest found".to_string())
            }),
            "✗ Generation failed: no package manifest found"
        );
        assert_eq!(
            describe_termination(&Termination::UnrecognizedStatus(BuildStatus::Unknown)),
            "⚠ Generation stopped with status 'unknown'"
        );
        assert!(describe_termination(&Termination::ConnectionLost("refused".into()))
            .contains("Connection to server lost"));
    }
}
