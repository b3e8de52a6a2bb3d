use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::application::ports::{JobProcessor, ProcessorError};
use crate::domain::{Job, JobResult};

/// HTTP adapter for the external computation service. Posts the job
/// identifier to `<base_url>/process` and treats any non-success status as a
/// processing failure carrying the response body.
pub struct HttpJobProcessor {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ProcessRequest {
    #[serde(rename = "jobId")]
    job_id: String,
}

impl HttpJobProcessor {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn process_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}process", self.base_url)
        } else {
            format!("{}/process", self.base_url)
        }
    }
}

#[async_trait]
impl JobProcessor for HttpJobProcessor {
    async fn process(&self, job: &Job) -> Result<JobResult, ProcessorError> {
        let url = self.process_url();
        tracing::info!(url = %url, job_id = %job.id.as_uuid(), "Calling external processor");

        let response = self
            .client
            .post(&url)
            .json(&ProcessRequest {
                job_id: job.id.as_uuid().to_string(),
            })
            .send()
            .await
            .map_err(|e| ProcessorError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProcessorError::RemoteStatus { status, body });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProcessorError::InvalidResponse(e.to_string()))?;

        Ok(JobResult::new(payload))
    }
}
