//! Per-session state machine
//!
//! `PollState` owns everything one session knows: the attempt counter, the
//! merged snapshot and whether the session has terminated. It applies the
//! [`policy`](crate::policy) to each query result and tells the driver what
//! to do next. It never sleeps or performs I/O.
//!
//! ```text
//! WAITING --(reading, continue)----------> WAITING
//! WAITING --(reading, stop)--------------> TERMINATED(success|error|timeout)
//! WAITING --(connectivity failure)-------> TERMINATED(connection-error)
//! WAITING --(transient, budget left)-----> WAITING
//! WAITING --(transient, budget spent)----> TERMINATED(timeout)
//! WAITING --(cancel)---------------------> TERMINATED(cancelled)
//! TERMINATED --(anything)----------------> TERMINATED
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use dockgen_core::domain::generation::Generation;
use dockgen_core::domain::job::{BuildStatus, JobId};
use dockgen_core::domain::snapshot::JobSnapshot;
use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::error::{PollError, QueryError};
use crate::policy::{self, Decision, Termination};

/// Session phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Terminated(Termination),
}

/// What the driver should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Sleep for the given delay, then query again
    Sleep(Duration),
    /// The session is over
    Stop(Termination),
}

/// Report published after every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollProgress {
    pub attempt: u32,
    /// Status from the most recent successful query
    pub last_status: Option<BuildStatus>,
    /// Message from the most recent failed query, cleared by a success
    pub last_error: Option<String>,
    pub snapshot: JobSnapshot,
    pub terminated: bool,
}

/// Final report of a terminated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub termination: Termination,
    pub attempts: u32,
    pub elapsed: Duration,
    pub snapshot: JobSnapshot,
    pub last_error: Option<String>,
}

impl PollOutcome {
    /// Whether the session ended with something the caller asked for
    pub fn is_success(&self) -> bool {
        matches!(
            self.termination,
            Termination::Succeeded | Termination::ArtifactReady
        )
    }

    /// Converts the outcome into the final snapshot or the matching error
    pub fn into_result(self) -> Result<JobSnapshot, PollError> {
        match self.termination {
            Termination::Succeeded | Termination::ArtifactReady => Ok(self.snapshot),
            Termination::Failed { detail } => Err(PollError::Job(
                detail.unwrap_or_else(|| "the job reported an error".to_string()),
            )),
            Termination::TimedOut => Err(PollError::Timeout {
                attempts: self.attempts,
                elapsed: self.elapsed,
            }),
            Termination::ConnectionLost(message) => Err(PollError::Connectivity(message)),
            Termination::UnrecognizedStatus(status) => {
                Err(PollError::UnexpectedStatus(status.to_string()))
            }
            Termination::Cancelled => Err(PollError::Cancelled),
        }
    }
}

/// State of one poll session
#[derive(Debug)]
pub struct PollState {
    config: PollConfig,
    attempts: u32,
    last_status: Option<BuildStatus>,
    last_error: Option<String>,
    snapshot: JobSnapshot,
    phase: Phase,
}

impl PollState {
    pub fn new(job_id: JobId, config: PollConfig) -> Self {
        Self {
            config,
            attempts: 0,
            last_status: None,
            last_error: None,
            snapshot: JobSnapshot::new(job_id),
            phase: Phase::Waiting,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.snapshot.job_id
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn snapshot(&self) -> &JobSnapshot {
        &self.snapshot
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Terminated(_))
    }

    /// Records that a query is about to be issued
    ///
    /// Returns `false` (and counts nothing) once the session has terminated.
    pub fn begin_query(&mut self) -> bool {
        if self.is_terminated() {
            return false;
        }
        self.attempts += 1;
        true
    }

    /// Applies a successful status reading
    pub fn on_reading(&mut self, generation: &Generation, elapsed: Duration, at: DateTime<Utc>) -> Step {
        if let Phase::Terminated(reason) = &self.phase {
            debug!("Ignoring reading for terminated session {}", self.job_id());
            return Step::Stop(reason.clone());
        }

        self.last_status = Some(generation.build_status);
        self.last_error = None;

        if self.snapshot.merge(generation, at) {
            debug!(
                "Job {} snapshot updated (status: {}, tags: {}, artifact: {})",
                self.job_id(),
                self.snapshot.status,
                self.snapshot.detected_tags.len(),
                self.snapshot.has_artifact()
            );
        }

        let decision = policy::after_reading(
            generation.build_status,
            generation.failure_detail(),
            self.snapshot.has_artifact(),
            self.attempts,
            elapsed,
            &self.config,
        );

        self.apply(decision, elapsed)
    }

    /// Applies a failed query
    pub fn on_failure(&mut self, error: &QueryError, elapsed: Duration) -> Step {
        if let Phase::Terminated(reason) = &self.phase {
            return Step::Stop(reason.clone());
        }

        warn!(
            "Status query {} for job {} failed: {}",
            self.attempts,
            self.job_id(),
            error
        );
        self.last_error = Some(error.to_string());

        let decision = policy::after_failure(error, self.attempts, elapsed, &self.config);
        self.apply(decision, elapsed)
    }

    /// Terminates the session at the caller's request
    ///
    /// Returns `true` if this call performed the transition; cancelling a
    /// terminated session changes nothing.
    pub fn cancel(&mut self) -> bool {
        if self.is_terminated() {
            return false;
        }
        info!("Polling for job {} cancelled", self.job_id());
        self.phase = Phase::Terminated(Termination::Cancelled);
        true
    }

    pub fn progress(&self) -> PollProgress {
        PollProgress {
            attempt: self.attempts,
            last_status: self.last_status,
            last_error: self.last_error.clone(),
            snapshot: self.snapshot.clone(),
            terminated: self.is_terminated(),
        }
    }

    /// Consumes the state into its final report
    ///
    /// A session that never terminated is reported as cancelled.
    pub fn into_outcome(self, elapsed: Duration) -> PollOutcome {
        let termination = match self.phase {
            Phase::Terminated(reason) => reason,
            Phase::Waiting => Termination::Cancelled,
        };

        PollOutcome {
            termination,
            attempts: self.attempts,
            elapsed,
            snapshot: self.snapshot,
            last_error: self.last_error,
        }
    }

    fn apply(&mut self, decision: Decision, elapsed: Duration) -> Step {
        match decision {
            Decision::Continue => Step::Sleep(self.config.interval),
            Decision::Stop(reason) => {
                info!(
                    "Polling for job {} stopped ({}) after {} attempt(s) in {:?}",
                    self.job_id(),
                    reason.tag(),
                    self.attempts,
                    elapsed
                );
                self.phase = Phase::Terminated(reason.clone());
                Step::Stop(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state() -> PollState {
        PollState::new(
            JobId::parse("abcdefghij0123456789").unwrap(),
            PollConfig::default(),
        )
    }

    fn reading(status: BuildStatus) -> Generation {
        Generation {
            build_status: status,
            ..Default::default()
        }
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_reading_in_progress_sleeps_for_interval() {
        let mut state = new_state();
        assert!(state.begin_query());

        let step = state.on_reading(&reading(BuildStatus::Pending), secs(1), Utc::now());

        assert_eq!(step, Step::Sleep(secs(2)));
        assert_eq!(state.attempts(), 1);
        assert_eq!(state.phase(), &Phase::Waiting);
    }

    #[test]
    fn test_success_terminates() {
        let mut state = new_state();
        state.begin_query();

        let mut done = reading(BuildStatus::Success);
        done.dockerfile = Some("FROM node:18".to_string());
        let step = state.on_reading(&done, secs(1), Utc::now());

        assert_eq!(step, Step::Stop(Termination::Succeeded));
        assert!(state.is_terminated());
        assert!(!state.begin_query());
        assert_eq!(state.attempts(), 1);
    }

    #[test]
    fn test_terminated_state_ignores_further_readings() {
        let mut state = new_state();
        state.begin_query();
        state.cancel();

        let mut late = reading(BuildStatus::Success);
        late.dockerfile = Some("FROM node:18".to_string());
        let step = state.on_reading(&late, secs(3), Utc::now());

        assert_eq!(step, Step::Stop(Termination::Cancelled));
        assert!(state.snapshot().artifact.is_none());
        assert_eq!(state.progress().last_status, None);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut state = new_state();

        assert!(state.cancel());
        assert!(!state.cancel());
        assert_eq!(state.phase(), &Phase::Terminated(Termination::Cancelled));
    }

    #[test]
    fn test_cancel_after_termination_keeps_reason() {
        let mut state = new_state();
        state.begin_query();
        state.on_failure(&QueryError::Connectivity("refused".into()), secs(1));

        assert!(!state.cancel());
        assert_eq!(
            state.phase(),
            &Phase::Terminated(Termination::ConnectionLost("refused".into()))
        );
    }

    #[test]
    fn test_transient_error_is_reported_then_cleared() {
        let mut state = new_state();
        state.begin_query();

        let step = state.on_failure(&QueryError::Transient("HTTP 502".into()), secs(1));
        assert_eq!(step, Step::Sleep(secs(2)));
        assert_eq!(
            state.progress().last_error.as_deref(),
            Some("status query failed: HTTP 502")
        );

        state.begin_query();
        state.on_reading(&reading(BuildStatus::Building), secs(3), Utc::now());
        assert!(state.progress().last_error.is_none());
        assert_eq!(state.progress().last_status, Some(BuildStatus::Building));
    }

    #[test]
    fn test_outcome_maps_to_errors() {
        let mut state = new_state();
        state.begin_query();
        let mut failed = reading(BuildStatus::Error);
        failed.error = Some("repository is empty".to_string());
        state.on_reading(&failed, secs(1), Utc::now());

        let outcome = state.into_outcome(secs(1));
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.into_result(),
            Err(PollError::Job("repository is empty".to_string()))
        );
    }

    #[test]
    fn test_timeout_outcome_preserves_snapshot() {
        let mut state = new_state();
        state.begin_query();
        let mut tagged = reading(BuildStatus::Building);
        tagged.tech_stack = vec!["Go".to_string()];
        let step = state.on_reading(&tagged, secs(121), Utc::now());
        assert_eq!(step, Step::Stop(Termination::TimedOut));

        let outcome = state.into_outcome(secs(121));
        assert_eq!(outcome.snapshot.detected_tags, vec!["Go".to_string()]);
        assert_eq!(
            outcome.into_result(),
            Err(PollError::Timeout {
                attempts: 1,
                elapsed: secs(121)
            })
        );
    }

    #[test]
    fn test_unterminated_outcome_is_cancelled() {
        let state = new_state();
        let outcome = state.into_outcome(Duration::ZERO);
        assert_eq!(outcome.termination, Termination::Cancelled);
    }
}
