//! Generation record as returned by the status endpoint

use serde::{Deserialize, Serialize};

use super::job::BuildStatus;

/// One status reading of a Dockerfile generation job
///
/// Every field except the status may be missing; the backend fills them in
/// progressively while the job runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub dockerfile: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub build_status: BuildStatus,
    #[serde(default)]
    pub error: Option<String>,
}

impl Generation {
    /// Generated Dockerfile, if the backend produced a non-empty one
    pub fn artifact(&self) -> Option<&str> {
        self.dockerfile.as_deref().filter(|s| !s.is_empty())
    }

    /// Failure message, if the backend produced a non-empty one
    pub fn failure_detail(&self) -> Option<&str> {
        self.error.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether this reading carries anything worth surfacing to the caller
    pub fn has_payload(&self) -> bool {
        self.artifact().is_some() || !self.tech_stack.is_empty()
    }
}
