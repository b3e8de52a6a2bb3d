use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobResult, JobStatus};

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &PgRow) -> Result<Job, RepositoryError> {
    let id: Uuid = get(row, "id")?;
    let status_str: String = get(row, "status")?;
    let status = status_str
        .parse::<JobStatus>()
        .map_err(RepositoryError::QueryFailed)?;
    let result: Option<serde_json::Value> = get(row, "result")?;

    Ok(Job {
        id: JobId::from_uuid(id),
        user_id: get(row, "user_id")?,
        project_id: get(row, "project_id")?,
        status,
        parameters: get(row, "parameters")?,
        result: result.map(JobResult::new),
        error_message: get(row, "error_message")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id.as_uuid()))]
    async fn save(&self, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, user_id, project_id, status, parameters, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.user_id)
        .bind(job.project_id)
        .bind(job.status.as_str())
        .bind(&job.parameters)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, project_id, status, parameters, result, error_message,
                   created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(map_row).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, project_id, status, parameters, result, error_message,
                   created_at, updated_at
            FROM jobs
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(map_row).collect()
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn claim_pending(&self, id: JobId) -> Result<bool, RepositoryError> {
        let updated = sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1, updated_at = $2
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(JobStatus::Processing.as_str())
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(JobStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(updated.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid(), status = %status))]
    async fn update_status(&self, id: JobId, status: JobStatus) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self, result), fields(job_id = %id.as_uuid()))]
    async fn update_result(&self, id: JobId, result: &JobResult) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET result = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(result.payload())
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self, error_message), fields(job_id = %id.as_uuid()))]
    async fn update_failure(
        &self,
        id: JobId,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET error_message = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(error_message)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
