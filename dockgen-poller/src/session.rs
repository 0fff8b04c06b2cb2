//! Poll sessions
//!
//! [`JobPoller`] starts one tokio task per watched job. The task sleeps until
//! the next wakeup, issues exactly one status query, feeds the result into a
//! [`PollState`] and repeats until the state machine says stop. The caller
//! keeps a [`PollSession`] handle to observe progress, cancel, or wait for
//! the outcome.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dockgen_core::domain::job::JobId;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::error::{PollError, QueryError};
use crate::policy::Termination;
use crate::source::StatusSource;
use crate::state::{PollOutcome, PollProgress, PollState, Step};

/// Starts poll sessions against a status source
#[derive(Clone)]
pub struct JobPoller {
    config: PollConfig,
    source: Arc<dyn StatusSource>,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(config: PollConfig, source: Arc<dyn StatusSource>) -> Self {
        Self { config, source }
    }

    /// Starts watching a job
    ///
    /// Returns as soon as the session is scheduled; the first query runs
    /// after the configured initial delay. Must be called from within a
    /// tokio runtime.
    ///
    /// # Errors
    /// `PollError::InvalidIdentifier` if the id is empty or too short. No
    /// session is created in that case.
    pub fn start(&self, job_id: impl AsRef<str>) -> Result<PollSession, PollError> {
        let job_id = JobId::parse(job_id)?;

        info!(
            "Starting poll session for job {} (interval: {:?})",
            job_id, self.config.interval
        );

        let state = PollState::new(job_id.clone(), self.config.clone());
        let (progress, _) = watch::channel(state.progress());
        let progress = Arc::new(progress);
        let token = CancellationToken::new();
        let started_at = Instant::now();

        let task = tokio::spawn(run_session(
            state,
            Arc::clone(&self.source),
            self.config.clone(),
            token.clone(),
            Arc::clone(&progress),
            started_at,
        ));

        Ok(PollSession {
            job_id,
            token: token.clone(),
            progress,
            started_at,
            task,
            _guard: token.drop_guard(),
        })
    }
}

/// Handle to a running poll session
///
/// Dropping the handle cancels the session.
pub struct PollSession {
    job_id: JobId,
    token: CancellationToken,
    progress: Arc<watch::Sender<PollProgress>>,
    started_at: Instant,
    task: JoinHandle<PollOutcome>,
    _guard: DropGuard,
}

impl PollSession {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Cancels the session
    ///
    /// The pending wakeup is cleared and the published progress is marked
    /// terminated before this returns. A query already in flight is allowed
    /// to finish but its result is discarded. Cancelling a session that has
    /// already terminated does nothing.
    pub fn cancel(&self) {
        if self.token.is_cancelled() {
            return;
        }

        debug!("Cancellation requested for job {}", self.job_id);
        self.token.cancel();
        self.progress.send_if_modified(|progress| {
            if progress.terminated {
                return false;
            }
            progress.terminated = true;
            true
        });
    }

    /// Latest published progress
    pub fn progress(&self) -> PollProgress {
        self.progress.borrow().clone()
    }

    /// Receiver notified after every query
    pub fn subscribe(&self) -> watch::Receiver<PollProgress> {
        self.progress.subscribe()
    }

    /// Waits for the session to terminate
    pub async fn wait(self) -> Result<PollOutcome, PollError> {
        self.task
            .await
            .map_err(|e| PollError::Aborted(e.to_string()))
    }

    /// Cancels the session and waits at most `grace` for it to wind down
    ///
    /// If a query is still in flight when `grace` runs out, the task is
    /// aborted and the outcome is built from the last published progress.
    pub async fn cancel_and_wait(self, grace: Duration) -> Result<PollOutcome, PollError> {
        self.cancel();

        let mut task = self.task;
        match time::timeout(grace, &mut task).await {
            Ok(joined) => joined.map_err(|e| PollError::Aborted(e.to_string())),
            Err(_) => {
                warn!(
                    "Poll task for job {} did not stop within {:?}, aborting it",
                    self.job_id, grace
                );
                task.abort();

                let last = self.progress.borrow().clone();
                Ok(PollOutcome {
                    termination: Termination::Cancelled,
                    attempts: last.attempt,
                    elapsed: self.started_at.elapsed(),
                    snapshot: last.snapshot,
                    last_error: last.last_error,
                })
            }
        }
    }
}

async fn run_session(
    mut state: PollState,
    source: Arc<dyn StatusSource>,
    config: PollConfig,
    token: CancellationToken,
    progress: Arc<watch::Sender<PollProgress>>,
    started_at: Instant,
) -> PollOutcome {
    let mut delay = config.initial_delay;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                state.cancel();
                break;
            }
            _ = time::sleep(delay) => {}
        }

        if !state.begin_query() {
            break;
        }

        debug!("Querying status of job {} (attempt {})", state.job_id(), state.attempts());
        let attempts = state.attempts();
        // Counted without waking subscribers; they are notified once the result is in.
        progress.send_if_modified(|current| {
            current.attempt = attempts;
            false
        });

        let query = source.query_status(state.job_id());
        let result = match time::timeout(config.request_timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Transient(format!(
                "no response within {:?}",
                config.request_timeout
            ))),
        };

        if token.is_cancelled() {
            debug!(
                "Discarding status of job {} received after cancellation",
                state.job_id()
            );
            state.cancel();
            break;
        }

        let elapsed = started_at.elapsed();
        let step = match result {
            Ok(generation) => state.on_reading(&generation, elapsed, Utc::now()),
            Err(err) => state.on_failure(&err, elapsed),
        };

        publish(&progress, state.progress());

        match step {
            Step::Sleep(next) => delay = next,
            Step::Stop(_) => break,
        }
    }

    publish(&progress, state.progress());
    state.into_outcome(started_at.elapsed())
}

/// Publishes progress without clearing a terminated mark set by `cancel`
fn publish(progress: &watch::Sender<PollProgress>, next: PollProgress) {
    progress.send_modify(|current| {
        let terminated = current.terminated || next.terminated;
        *current = next;
        current.terminated = terminated;
    });
}
