use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::services::SubmitJobError;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct SubmitJobRequest {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "projectId")]
    pub project_id: Option<i64>,
    #[serde(default = "default_parameters")]
    pub parameters: serde_json::Value,
}

fn default_parameters() -> serde_json::Value {
    serde_json::json!({})
}

#[derive(Serialize)]
pub struct SubmitJobResponse {
    #[serde(rename = "jobId")]
    pub job_id: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request), fields(user_id = request.user_id))]
pub async fn submit_job_handler(
    State(state): State<AppState>,
    Json(request): Json<SubmitJobRequest>,
) -> impl IntoResponse {
    match state
        .job_service
        .submit_job(request.user_id, request.project_id, request.parameters)
        .await
    {
        Ok(job) => (
            StatusCode::ACCEPTED,
            Json(SubmitJobResponse {
                job_id: job.id.as_uuid().to_string(),
                status: job.status.as_str().to_string(),
            }),
        )
            .into_response(),
        Err(e) if e.is_validation() => {
            tracing::warn!(error = %e, "Job submission rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
        Err(SubmitJobError::Dispatch(e)) => {
            tracing::error!(error = %e, "Failed to dispatch job");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Dispatch queue unavailable".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit job");
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
