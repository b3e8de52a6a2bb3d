use async_trait::async_trait;

use crate::domain::{Job, JobId, JobResult, JobStatus};

use super::RepositoryError;

/// Persistence port for job records. Every write targets a single row by
/// identifier; the core performs no multi-row transactions and never retries
/// a failed operation.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn save(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Jobs for one user, newest first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Job>, RepositoryError>;

    /// Conditional Pending -> Processing transition. Returns `false` when the
    /// job is absent or no longer Pending, so a duplicate delivery of the
    /// same identifier claims nothing.
    async fn claim_pending(&self, id: JobId) -> Result<bool, RepositoryError>;

    async fn update_status(&self, id: JobId, status: JobStatus) -> Result<(), RepositoryError>;

    async fn update_result(&self, id: JobId, result: &JobResult) -> Result<(), RepositoryError>;

    async fn update_failure(&self, id: JobId, error_message: &str)
        -> Result<(), RepositoryError>;
}
