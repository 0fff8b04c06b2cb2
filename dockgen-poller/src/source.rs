//! Status-query capability
//!
//! The poller only needs to read a job's status. Anything that can do that
//! (the HTTP client, a test double) implements [`StatusSource`].

use async_trait::async_trait;
use dockgen_client::{ClientError, GenerationClient};
use dockgen_core::domain::generation::Generation;
use dockgen_core::domain::job::JobId;

use crate::error::QueryError;

/// Source of job status readings
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Reads the current status of a job
    ///
    /// Must be safe to call repeatedly for the same job.
    async fn query_status(&self, job_id: &JobId) -> Result<Generation, QueryError>;
}

#[async_trait]
impl StatusSource for GenerationClient {
    async fn query_status(&self, job_id: &JobId) -> Result<Generation, QueryError> {
        self.get_generation_status(job_id)
            .await
            .map_err(QueryError::from)
    }
}

impl From<ClientError> for QueryError {
    fn from(err: ClientError) -> Self {
        if err.is_connectivity() {
            QueryError::Connectivity(err.to_string())
        } else {
            QueryError::Transient(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_query_errors() {
        let err = QueryError::from(ClientError::api_error(500, "boom"));
        assert!(matches!(err, QueryError::Transient(ref m) if m.contains("500")));

        let err = QueryError::from(ClientError::ParseError("bad json".into()));
        assert!(matches!(err, QueryError::Transient(_)));
    }

    #[tokio::test]
    async fn test_closed_port_maps_to_connectivity() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GenerationClient::new(format!("http://{}", addr));
        let job_id = JobId::parse("abcdefghij0123456789").unwrap();
        let err = client.query_status(&job_id).await.unwrap_err();

        assert!(matches!(err, QueryError::Connectivity(_)), "unexpected error: {err}");
    }
}
