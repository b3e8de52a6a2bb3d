use async_trait::async_trait;

use crate::domain::{Job, JobResult};

/// External computation service that performs the actual job work. Any
/// failure here is a job failure, never a retryable condition.
#[async_trait]
pub trait JobProcessor: Send + Sync {
    async fn process(&self, job: &Job) -> Result<JobResult, ProcessorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("processor request failed: {0}")]
    RequestFailed(String),
    #[error("processor returned error: {status} - {body}")]
    RemoteStatus { status: u16, body: String },
    #[error("invalid processor response: {0}")]
    InvalidResponse(String),
}
