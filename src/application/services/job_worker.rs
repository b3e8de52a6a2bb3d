use std::sync::Arc;

use tracing::Instrument;

use crate::application::ports::{JobProcessor, JobRepository, ProcessorError, RepositoryError};
use crate::domain::{JobId, JobStatus};

use super::JobFeed;

/// Runs the processing chain for one job identifier at a time: claim the
/// job, load it, call the external processor, persist the outcome. Many
/// worker instances may consume the same feed concurrently; they share no
/// state, so correctness rests on the repository's per-row atomicity.
pub struct JobWorker {
    feed: JobFeed,
    job_repository: Arc<dyn JobRepository>,
    processor: Arc<dyn JobProcessor>,
}

impl JobWorker {
    pub fn new(
        feed: JobFeed,
        job_repository: Arc<dyn JobRepository>,
        processor: Arc<dyn JobProcessor>,
    ) -> Self {
        Self {
            feed,
            job_repository,
            processor,
        }
    }

    pub async fn run(self) {
        tracing::info!("Job worker started");
        while let Some(msg) = self.feed.next().await {
            let span = tracing::info_span!("job", job_id = %msg.job_id.as_uuid());

            async {
                if let Err(e) = self.process(msg.job_id).await {
                    tracing::error!(error = %e, "Job processing failed");
                }
            }
            .instrument(span)
            .await;
        }
        tracing::info!("Job worker stopped: channel closed");
    }

    async fn process(&self, job_id: JobId) -> Result<(), JobWorkerError> {
        let claimed = self
            .job_repository
            .claim_pending(job_id)
            .await
            .map_err(JobWorkerError::Repository)?;
        if !claimed {
            // Duplicate delivery, or an identifier whose record is gone.
            tracing::debug!("Job not pending, dropping delivery");
            return Ok(());
        }

        if let Err(e) = self.run_chain(job_id).await {
            self.record_failure(job_id, &e.to_string()).await;
            return Err(e);
        }

        tracing::info!("Job completed");
        Ok(())
    }

    async fn run_chain(&self, job_id: JobId) -> Result<(), JobWorkerError> {
        let job = self
            .job_repository
            .find_by_id(job_id)
            .await
            .map_err(JobWorkerError::Repository)?
            .ok_or(JobWorkerError::JobVanished(job_id))?;

        tracing::info!("Processing job with external service");
        let result = self
            .processor
            .process(&job)
            .await
            .map_err(JobWorkerError::Processor)?;

        tracing::debug!("Job processed, saving result");
        self.job_repository
            .update_result(job_id, &result)
            .await
            .map_err(JobWorkerError::Repository)?;

        self.job_repository
            .update_status(job_id, JobStatus::Completed)
            .await
            .map_err(JobWorkerError::Repository)?;

        Ok(())
    }

    /// Best-effort failure recording. If these writes fail too, the job is
    /// left at whatever status it last reached; the error is only logged.
    async fn record_failure(&self, job_id: JobId, message: &str) {
        if let Err(e) = self.job_repository.update_failure(job_id, message).await {
            tracing::error!(error = %e, "Failed to record failure reason");
            return;
        }
        if let Err(e) = self
            .job_repository
            .update_status(job_id, JobStatus::Failed)
            .await
        {
            tracing::error!(error = %e, "Failed to mark job as failed");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobWorkerError {
    #[error("Job not found: {}", .0.as_uuid())]
    JobVanished(JobId),
    #[error("external processor: {0}")]
    Processor(ProcessorError),
    #[error("repository: {0}")]
    Repository(RepositoryError),
}
