use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobResult, JobStatus};

/// Map-backed job store with the same single-row update semantics as the
/// Postgres adapter. Used by the test suites and local runs without a
/// database.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<JobId, Job>>, RepositoryError> {
        self.jobs
            .lock()
            .map_err(|_| RepositoryError::QueryFailed("job store lock poisoned".to_string()))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn save(&self, job: &Job) -> Result<(), RepositoryError> {
        self.lock()?.insert(job.id, job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Job>, RepositoryError> {
        let mut jobs: Vec<Job> = self
            .lock()?
            .values()
            .filter(|job| job.user_id == user_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn claim_pending(&self, id: JobId) -> Result<bool, RepositoryError> {
        let mut jobs = self.lock()?;
        match jobs.get_mut(&id) {
            Some(job) if job.status == JobStatus::Pending => {
                job.status = JobStatus::Processing;
                job.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_status(&self, id: JobId, status: JobStatus) -> Result<(), RepositoryError> {
        if let Some(job) = self.lock()?.get_mut(&id) {
            job.status = status;
            job.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_result(&self, id: JobId, result: &JobResult) -> Result<(), RepositoryError> {
        if let Some(job) = self.lock()?.get_mut(&id) {
            job.result = Some(result.clone());
            job.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_failure(
        &self,
        id: JobId,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        if let Some(job) = self.lock()?.get_mut(&id) {
            job.error_message = Some(error_message.to_string());
            job.updated_at = Utc::now();
        }
        Ok(())
    }
}
