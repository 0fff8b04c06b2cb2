//! Continue/stop policy
//!
//! Pure functions deciding what a session does after each query. They take
//! everything they need as arguments so they can be tested without a clock
//! or a runtime.

use std::time::Duration;

use dockgen_core::domain::job::BuildStatus;

use crate::config::PollConfig;
use crate::error::QueryError;

/// Why a session stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The job reported `success`
    Succeeded,
    /// An artifact was observed before the job reported a terminal status
    ArtifactReady,
    /// The job reported `error`
    Failed { detail: Option<String> },
    /// Attempt or time budget exhausted
    TimedOut,
    /// The status endpoint was unreachable
    ConnectionLost(String),
    /// Polling stopped on a status this client does not understand
    UnrecognizedStatus(BuildStatus),
    /// The caller cancelled the session
    Cancelled,
}

impl Termination {
    /// Short tag for logs and display
    pub fn tag(&self) -> &'static str {
        match self {
            Termination::Succeeded | Termination::ArtifactReady => "success",
            Termination::Failed { .. } => "error",
            Termination::TimedOut => "timeout",
            Termination::ConnectionLost(_) => "connection-error",
            Termination::UnrecognizedStatus(_) => "unrecognized",
            Termination::Cancelled => "cancelled",
        }
    }
}

/// What to do after a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Query again after the configured interval
    Continue,
    Stop(Termination),
}

/// Whether another query may still be scheduled
///
/// The next query would be issued one interval from now, so that is the
/// time checked against the outer ceiling.
pub fn within_budget(attempts: u32, elapsed: Duration, config: &PollConfig) -> bool {
    attempts < config.max_attempts && elapsed + config.interval <= config.max_elapsed
}

/// Decides after a successful status reading
///
/// Rules, first match wins:
/// 1. `success`, or `error` with a failure detail, stops.
/// 2. An artifact already in the snapshot stops, whatever the status.
/// 3. Elapsed time past the forced ceiling stops.
/// 4. `pending`/`building` within the attempt and time budget continues.
/// 5. Anything else stops.
pub fn after_reading(
    status: BuildStatus,
    failure_detail: Option<&str>,
    has_artifact: bool,
    attempts: u32,
    elapsed: Duration,
    config: &PollConfig,
) -> Decision {
    match (status, failure_detail) {
        (BuildStatus::Success, _) => return Decision::Stop(Termination::Succeeded),
        (BuildStatus::Error, Some(detail)) => {
            return Decision::Stop(Termination::Failed {
                detail: Some(detail.to_string()),
            });
        }
        _ => {}
    }

    if has_artifact {
        return Decision::Stop(Termination::ArtifactReady);
    }

    if elapsed > config.force_stop_after {
        return Decision::Stop(Termination::TimedOut);
    }

    if status.is_in_progress() && within_budget(attempts, elapsed, config) {
        return Decision::Continue;
    }

    Decision::Stop(match status {
        BuildStatus::Error => Termination::Failed { detail: None },
        BuildStatus::Unknown => Termination::UnrecognizedStatus(status),
        _ => Termination::TimedOut,
    })
}

/// Decides after a failed query
///
/// Connectivity failures stop at once. Other failures are retried while the
/// attempt and time budget allow, then stop as a timeout.
pub fn after_failure(
    error: &QueryError,
    attempts: u32,
    elapsed: Duration,
    config: &PollConfig,
) -> Decision {
    match error {
        QueryError::Connectivity(message) => {
            Decision::Stop(Termination::ConnectionLost(message.clone()))
        }
        QueryError::Transient(_) if within_budget(attempts, elapsed, config) => Decision::Continue,
        QueryError::Transient(_) => Decision::Stop(Termination::TimedOut),
    }
}
