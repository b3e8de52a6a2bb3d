use serde_json::json;

use mandalay::domain::{Job, JobResult, JobStatus};

#[test]
fn given_new_job_then_it_is_pending_with_equal_timestamps() {
    let params = json!({"task": "x"});
    let job = Job::new(1, Some(2), params.clone());

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.user_id, 1);
    assert_eq!(job.project_id, Some(2));
    assert_eq!(job.parameters, params);
    assert!(job.result.is_none());
    assert!(job.error_message.is_none());
    assert_eq!(job.created_at, job.updated_at);
    assert!(!job.id.as_uuid().is_nil());
}

#[test]
fn given_two_new_jobs_then_identifiers_are_distinct() {
    let a = Job::new(1, None, json!({}));
    let b = Job::new(1, None, json!({}));

    assert_ne!(a.id, b.id);
}

#[test]
fn given_status_strings_then_parse_and_display_round_trip() {
    for status in [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
    ] {
        let parsed: JobStatus = status.as_str().parse().expect("known status");
        assert_eq!(parsed, status);
        assert_eq!(status.to_string(), status.as_str());
    }

    assert!("QUEUED".parse::<JobStatus>().is_err());
    assert!("pending".parse::<JobStatus>().is_err());
}

#[test]
fn given_statuses_then_only_completed_and_failed_are_terminal() {
    assert!(!JobStatus::Pending.is_terminal());
    assert!(!JobStatus::Processing.is_terminal());
    assert!(JobStatus::Completed.is_terminal());
    assert!(JobStatus::Failed.is_terminal());
}

#[test]
fn given_job_result_then_payload_is_passed_through_unmodified() {
    let payload = json!({"status": "success", "output": [1, 2, 3]});
    let result = JobResult::new(payload.clone());

    assert_eq!(result.payload(), &payload);
    assert_eq!(result.into_payload(), payload);
}
