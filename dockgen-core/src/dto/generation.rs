//! Generation DTOs

use serde::{Deserialize, Serialize};

use crate::domain::generation::Generation;

/// Commit message used when the caller does not supply one
pub const DEFAULT_COMMIT_MESSAGE: &str = "Add Dockerfile generated by DockGen AI";

/// Request to start a Dockerfile generation for a repository
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub github_url: String,
    pub github_token: String,
}

// The token is a credential and must never end up in logs.
impl std::fmt::Debug for GenerateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateRequest")
            .field("github_url", &self.github_url)
            .field("github_token", &"<redacted>")
            .finish()
    }
}

/// Response to an accepted generation request
///
/// The id is kept as raw text here; callers validate it with
/// [`JobId::parse`](crate::domain::job::JobId::parse) before polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default, deserialize_with = "id_as_string")]
    pub generation_id: String,
}

/// Envelope returned by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub generation: Generation,
}

/// Request to commit the generated Dockerfile to the originating repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub commit_message: String,
}

/// Result of a push
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Some backends send numeric ids; accept both and normalize to text.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
