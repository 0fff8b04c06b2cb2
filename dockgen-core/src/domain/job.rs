//! Job identity and status types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest identifier the backend is known to issue
///
/// Anything shorter is almost certainly a truncated or mangled id, so it is
/// rejected before a poll session is created.
pub const MIN_JOB_ID_LEN: usize = 20;

/// Error returned when a job identifier cannot be used for polling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidJobId {
    #[error("job id is empty")]
    Empty,

    #[error("job id '{id}' is too short ({len} < {min} characters)")]
    TooShort { id: String, len: usize, min: usize },
}

/// Opaque, server-issued job identifier
///
/// The value is never interpreted; it is only checked for presence and a
/// minimum length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Parse a raw identifier
    ///
    /// The value is kept verbatim; callers handling user input trim it first.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, InvalidJobId> {
        let id = raw.as_ref();

        if id.is_empty() {
            return Err(InvalidJobId::Empty);
        }

        let len = id.chars().count();
        if len < MIN_JOB_ID_LEN {
            return Err(InvalidJobId::TooShort {
                id: id.to_string(),
                len,
                min: MIN_JOB_ID_LEN,
            });
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build status reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    #[default]
    Pending,
    Building,
    Success,
    Error,
    /// Any value the backend sends that this client does not know about
    #[serde(other)]
    Unknown,
}

impl BuildStatus {
    /// Whether the job is still being worked on by the backend
    pub fn is_in_progress(self) -> bool {
        matches!(self, BuildStatus::Pending | BuildStatus::Building)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildStatus::Pending => "pending",
            BuildStatus::Building => "building",
            BuildStatus::Success => "success",
            BuildStatus::Error => "error",
            BuildStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
