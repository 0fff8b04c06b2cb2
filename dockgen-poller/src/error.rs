//! Error types for the poller

use std::time::Duration;

use dockgen_core::domain::job::InvalidJobId;
use thiserror::Error;

/// Failure of a single status query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The status endpoint could not be reached; polling stops
    #[error("status endpoint unreachable: {0}")]
    Connectivity(String),

    /// Any other failure; polling retries while budget remains
    #[error("status query failed: {0}")]
    Transient(String),
}

/// Reason a poll session did not produce a usable snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("invalid job id: {0}")]
    InvalidIdentifier(#[from] InvalidJobId),

    #[error("connection to the generation service lost: {0}")]
    Connectivity(String),

    #[error("polling gave up after {attempts} attempt(s) in {elapsed:?}")]
    Timeout { attempts: u32, elapsed: Duration },

    #[error("generation failed: {0}")]
    Job(String),

    #[error("generation ended with unexpected status '{0}'")]
    UnexpectedStatus(String),

    #[error("polling was cancelled")]
    Cancelled,

    #[error("poll task aborted: {0}")]
    Aborted(String),
}

impl PollError {
    /// Whether the caller asked for this outcome
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
