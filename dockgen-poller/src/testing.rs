//! Test doubles for the poller

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dockgen_core::domain::generation::Generation;
use dockgen_core::domain::job::{BuildStatus, JobId};
use tokio::sync::Notify;

use crate::error::QueryError;
use crate::source::StatusSource;

pub const JOB_ID: &str = "abcdefghij0123456789";

pub fn reading(status: BuildStatus) -> Generation {
    Generation {
        build_status: status,
        ..Default::default()
    }
}

/// Status source replaying a fixed script of results
///
/// Once the script is exhausted every query returns the fallback.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Generation, QueryError>>>,
    fallback: Result<Generation, QueryError>,
    latency: Duration,
    gate: Option<Arc<Notify>>,
    calls: AtomicU32,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Generation, QueryError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Ok(reading(BuildStatus::Building)),
            latency: Duration::ZERO,
            gate: None,
            calls: AtomicU32::new(0),
            in_flight: AtomicU32::new(0),
            max_in_flight: AtomicU32::new(0),
        }
    }

    pub fn with_fallback(mut self, fallback: Result<Generation, QueryError>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Each query takes this long to answer
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Each query blocks until the gate is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn query_status(&self, job_id: &JobId) -> Result<Generation, QueryError> {
        assert_eq!(job_id.as_str(), JOB_ID);

        self.calls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.script.lock().unwrap().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        next.unwrap_or_else(|| self.fallback.clone())
    }
}
