//! Generation-related API endpoints

use crate::GenerationClient;
use crate::error::{ClientError, Result};
use dockgen_core::domain::generation::Generation;
use dockgen_core::domain::job::JobId;
use dockgen_core::dto::generation::{
    GenerateRequest, GenerateResponse, PushRequest, PushResponse, StatusResponse,
};
use tracing::debug;

impl GenerationClient {
    // =============================================================================
    // Generation Lifecycle
    // =============================================================================

    /// Submit a Dockerfile generation request
    ///
    /// Must be called once per user-initiated generation. The returned id is
    /// not validated here.
    ///
    /// # Arguments
    /// * `req` - Repository URL and access token
    ///
    /// # Example
    /// ```no_run
    /// # use dockgen_client::GenerationClient;
    /// # use dockgen_core::dto::generation::GenerateRequest;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = GenerationClient::new("http://localhost:8080");
    /// let accepted = client.submit_generation(&GenerateRequest {
    ///     github_url: "https://github.com/acme/app".to_string(),
    ///     github_token: "ghp_...".to_string(),
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_generation(&self, req: &GenerateRequest) -> Result<GenerateResponse> {
        let url = self.endpoint(&["api", "generate"])?;
        debug!("Submitting generation for {}", req.github_url);

        let response = self.client.post(url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get the current status of a generation
    ///
    /// Safe to call repeatedly.
    ///
    /// # Arguments
    /// * `job_id` - The generation id returned by [`submit_generation`](Self::submit_generation)
    pub async fn get_generation_status(&self, job_id: &JobId) -> Result<Generation> {
        let url = self.endpoint(&["api", "generate", job_id.as_str(), "status"])?;
        let response = self.client.get(url).send().await?;

        let envelope: StatusResponse = self.handle_response(response).await?;
        Ok(envelope.generation)
    }

    /// Push the generated Dockerfile to the originating repository
    ///
    /// Only call this on an explicit user action.
    ///
    /// # Arguments
    /// * `job_id` - The generation whose Dockerfile should be committed
    /// * `commit_message` - Message for the commit created in the repository
    pub async fn push_dockerfile(&self, job_id: &JobId, commit_message: &str) -> Result<PushResponse> {
        let url = self.endpoint(&["api", "generate", job_id.as_str(), "push"])?;
        debug!("Pushing Dockerfile for generation {}", job_id);

        let response = self
            .client
            .post(url)
            .json(&PushRequest {
                commit_message: commit_message.to_string(),
            })
            .send()
            .await?;

        let pushed: PushResponse = self.handle_response(response).await?;
        if !pushed.success {
            return Err(ClientError::Rejected(
                pushed
                    .message
                    .unwrap_or_else(|| "push was not accepted".to_string()),
            ));
        }

        Ok(pushed)
    }
}
