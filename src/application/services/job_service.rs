use std::sync::Arc;

use serde_json::Value;

use crate::application::ports::{
    DirectoryError, JobRepository, ProjectDirectory, RepositoryError, UserDirectory,
};
use crate::domain::{Job, JobId};

use super::{DispatchError, JobDispatch};

/// Translates an untrusted submission into a durably persisted,
/// dispatch-ready job. Ordering is significant: validate, save, publish.
/// A failure at any stage short-circuits all later stages.
pub struct JobService {
    job_repository: Arc<dyn JobRepository>,
    user_directory: Arc<dyn UserDirectory>,
    project_directory: Arc<dyn ProjectDirectory>,
    dispatch: JobDispatch,
}

impl JobService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        user_directory: Arc<dyn UserDirectory>,
        project_directory: Arc<dyn ProjectDirectory>,
        dispatch: JobDispatch,
    ) -> Self {
        Self {
            job_repository,
            user_directory,
            project_directory,
            dispatch,
        }
    }

    pub async fn submit_job(
        &self,
        user_id: i64,
        project_id: Option<i64>,
        parameters: Value,
    ) -> Result<Job, SubmitJobError> {
        if !self
            .user_directory
            .exists(user_id)
            .await
            .map_err(SubmitJobError::Directory)?
        {
            return Err(SubmitJobError::UserNotFound(user_id));
        }

        if let Some(project_id) = project_id {
            if !self
                .project_directory
                .exists(project_id)
                .await
                .map_err(SubmitJobError::Directory)?
            {
                return Err(SubmitJobError::ProjectNotFound(project_id));
            }
        }

        let job = Job::new(user_id, project_id, parameters);

        self.job_repository
            .save(&job)
            .await
            .map_err(SubmitJobError::Repository)?;

        tracing::info!(job_id = %job.id.as_uuid(), "Sending job to worker pool");
        self.dispatch
            .publish(job.id)
            .await
            .map_err(SubmitJobError::Dispatch)?;
        tracing::debug!(job_id = %job.id.as_uuid(), "Job accepted for dispatch");

        Ok(job)
    }

    pub async fn get_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        self.job_repository.find_by_id(id).await
    }

    pub async fn jobs_by_user(&self, user_id: i64) -> Result<Vec<Job>, RepositoryError> {
        self.job_repository.find_by_user(user_id).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitJobError {
    #[error("User not found: {0}")]
    UserNotFound(i64),
    #[error("Project not found: {0}")]
    ProjectNotFound(i64),
    #[error("directory: {0}")]
    Directory(DirectoryError),
    #[error("repository: {0}")]
    Repository(RepositoryError),
    #[error("dispatch: {0}")]
    Dispatch(DispatchError),
}

impl SubmitJobError {
    /// Caller-correctable precondition failures, as opposed to internal ones.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SubmitJobError::UserNotFound(_) | SubmitJobError::ProjectNotFound(_)
        )
    }
}
