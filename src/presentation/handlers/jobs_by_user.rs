use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobSummary {
    #[serde(rename = "jobId")]
    pub job_id: String,
    pub status: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "projectId")]
    pub project_id: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn jobs_by_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    match state.job_service.jobs_by_user(user_id).await {
        Ok(jobs) => {
            let summaries: Vec<JobSummary> = jobs
                .into_iter()
                .map(|job| JobSummary {
                    job_id: job.id.as_uuid().to_string(),
                    status: job.status.as_str().to_string(),
                    user_id: job.user_id,
                    project_id: job.project_id,
                    created_at: job.created_at.to_rfc3339(),
                })
                .collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list jobs for user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
