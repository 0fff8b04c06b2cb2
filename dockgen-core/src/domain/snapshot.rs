//! Caller-visible view of a job

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::generation::Generation;
use super::job::{BuildStatus, JobId};

/// Latest merged view of a job as observed by one poll session
///
/// Merging is cumulative: once an artifact or a tag set has been seen, a
/// later reading without it does not erase it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub status: BuildStatus,
    pub artifact: Option<String>,
    pub detected_tags: Vec<String>,
    pub failure_detail: Option<String>,
    /// When a reading was last merged into this snapshot
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobSnapshot {
    /// Creates an empty snapshot for a job that has not been observed yet
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            status: BuildStatus::Pending,
            artifact: None,
            detected_tags: Vec::new(),
            failure_detail: None,
            updated_at: None,
        }
    }

    /// Merges a status reading into the snapshot
    ///
    /// Readings with neither an artifact nor detected tags are ignored.
    /// Returns `true` when the snapshot was updated.
    pub fn merge(&mut self, generation: &Generation, at: DateTime<Utc>) -> bool {
        if !generation.has_payload() {
            return false;
        }

        self.status = generation.build_status;

        if let Some(artifact) = generation.artifact() {
            self.artifact = Some(artifact.to_string());
        }

        if !generation.tech_stack.is_empty() {
            self.detected_tags = generation.tech_stack.clone();
        }

        if generation.build_status == BuildStatus::Error {
            if let Some(detail) = generation.failure_detail() {
                self.failure_detail = Some(detail.to_string());
            }
        } else {
            self.failure_detail = None;
        }

        self.updated_at = Some(at);
        true
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }
}
