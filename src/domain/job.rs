use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{JobId, JobStatus};

/// Payload produced by the external processor. Opaque to the core: it is
/// stored and returned verbatim, never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct JobResult(Value);

impl JobResult {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }

    pub fn into_payload(self) -> Value {
        self.0
    }
}

/// A unit of submitted work, tracked through the fixed lifecycle.
///
/// `result` and `error_message` are mutually exclusive: a terminal job has
/// exactly one of them set.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub status: JobStatus,
    pub parameters: Value,
    pub result: Option<JobResult>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(user_id: i64, project_id: Option<i64>, parameters: Value) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            user_id,
            project_id,
            status: JobStatus::Pending,
            parameters,
            result: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}
