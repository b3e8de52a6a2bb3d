use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use mandalay::application::ports::{
    JobProcessor, JobRepository, ProcessorError, RepositoryError,
};
use mandalay::application::services::{JobWorker, dispatch_channel};
use mandalay::domain::{Job, JobId, JobResult, JobStatus};
use mandalay::infrastructure::persistence::InMemoryJobRepository;

struct CountingProcessor {
    calls: AtomicUsize,
}

impl CountingProcessor {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl JobProcessor for CountingProcessor {
    async fn process(&self, _job: &Job) -> Result<JobResult, ProcessorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(JobResult::new(json!({"status": "success"})))
    }
}

struct FailingProcessor;

#[async_trait::async_trait]
impl JobProcessor for FailingProcessor {
    async fn process(&self, _job: &Job) -> Result<JobResult, ProcessorError> {
        Err(ProcessorError::RemoteStatus {
            status: 500,
            body: "worker exploded".to_string(),
        })
    }
}

async fn seed_job(repository: &InMemoryJobRepository) -> Job {
    let job = Job::new(1, None, json!({"task": "x"}));
    repository.save(&job).await.expect("seed job");
    // Keep the claim timestamp strictly after creation.
    tokio::time::sleep(Duration::from_millis(2)).await;
    job
}

#[tokio::test]
async fn given_successful_processing_then_job_completes_with_result() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let processor = Arc::new(CountingProcessor::new());
    let (dispatch, feed) = dispatch_channel(8);

    let job = seed_job(&repository).await;
    dispatch.publish(job.id).await.unwrap();
    drop(dispatch);

    JobWorker::new(feed, repository.clone(), processor.clone())
        .run()
        .await;

    let done = repository.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(
        done.result,
        Some(JobResult::new(json!({"status": "success"})))
    );
    assert!(done.error_message.is_none());
    assert!(done.updated_at > done.created_at);
    assert_eq!(processor.calls(), 1);
}

#[tokio::test]
async fn given_processor_error_then_job_fails_with_message_containing_status() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let (dispatch, feed) = dispatch_channel(8);

    let job = seed_job(&repository).await;
    dispatch.publish(job.id).await.unwrap();
    drop(dispatch);

    JobWorker::new(feed, repository.clone(), Arc::new(FailingProcessor))
        .run()
        .await;

    let done = repository.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(done.status, JobStatus::Failed);
    assert!(done.result.is_none());
    let message = done.error_message.expect("failure reason recorded");
    assert!(message.contains("500"), "message was: {}", message);
    assert!(message.contains("worker exploded"));
}

#[tokio::test]
async fn given_duplicate_delivery_then_job_is_processed_exactly_once() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let processor = Arc::new(CountingProcessor::new());
    let (dispatch, feed) = dispatch_channel(8);

    let job = seed_job(&repository).await;
    dispatch.publish(job.id).await.unwrap();
    dispatch.publish(job.id).await.unwrap();
    drop(dispatch);

    JobWorker::new(feed, repository.clone(), processor.clone())
        .run()
        .await;

    assert_eq!(processor.calls(), 1);
    let done = repository.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(done.status, JobStatus::Completed);
}

#[tokio::test]
async fn given_terminal_job_then_delivery_is_dropped_without_processing() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let processor = Arc::new(CountingProcessor::new());
    let (dispatch, feed) = dispatch_channel(8);

    let job = seed_job(&repository).await;
    repository
        .update_status(job.id, JobStatus::Completed)
        .await
        .unwrap();
    dispatch.publish(job.id).await.unwrap();
    drop(dispatch);

    JobWorker::new(feed, repository.clone(), processor.clone())
        .run()
        .await;

    assert_eq!(processor.calls(), 0);
    let done = repository.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(done.status, JobStatus::Completed);
}

#[tokio::test]
async fn given_unknown_identifier_then_delivery_is_dropped() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let processor = Arc::new(CountingProcessor::new());
    let (dispatch, feed) = dispatch_channel(8);

    dispatch.publish(JobId::new()).await.unwrap();
    drop(dispatch);

    JobWorker::new(feed, repository, processor.clone()).run().await;

    assert_eq!(processor.calls(), 0);
}

/// Repository that claims successfully but has no record behind the claim,
/// the window where a job vanishes between dispatch and load.
#[derive(Default)]
struct VanishingJobRepository {
    failures: Mutex<Vec<String>>,
    statuses: Mutex<Vec<JobStatus>>,
}

#[async_trait::async_trait]
impl JobRepository for VanishingJobRepository {
    async fn save(&self, _job: &Job) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(None)
    }

    async fn find_by_user(&self, _user_id: i64) -> Result<Vec<Job>, RepositoryError> {
        Ok(vec![])
    }

    async fn claim_pending(&self, _id: JobId) -> Result<bool, RepositoryError> {
        Ok(true)
    }

    async fn update_status(&self, _id: JobId, status: JobStatus) -> Result<(), RepositoryError> {
        self.statuses.lock().unwrap().push(status);
        Ok(())
    }

    async fn update_result(
        &self,
        _id: JobId,
        _result: &JobResult,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn update_failure(
        &self,
        _id: JobId,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        self.failures.lock().unwrap().push(error_message.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn given_claimed_job_that_vanished_then_failure_is_recorded() {
    let repository = Arc::new(VanishingJobRepository::default());
    let (dispatch, feed) = dispatch_channel(8);

    dispatch.publish(JobId::new()).await.unwrap();
    drop(dispatch);

    JobWorker::new(feed, repository.clone(), Arc::new(CountingProcessor::new()))
        .run()
        .await;

    let failures = repository.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("Job not found"));

    let statuses = repository.statuses.lock().unwrap();
    assert_eq!(statuses.as_slice(), &[JobStatus::Failed]);
}

/// Repository where the failure-path writes themselves fail; the worker must
/// log and move on without touching the status.
#[derive(Default)]
struct BrokenFailurePathRepository {
    statuses: Mutex<Vec<JobStatus>>,
}

#[async_trait::async_trait]
impl JobRepository for BrokenFailurePathRepository {
    async fn save(&self, _job: &Job) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(Some(Job::new(1, None, json!({}))))
    }

    async fn find_by_user(&self, _user_id: i64) -> Result<Vec<Job>, RepositoryError> {
        Ok(vec![])
    }

    async fn claim_pending(&self, _id: JobId) -> Result<bool, RepositoryError> {
        Ok(true)
    }

    async fn update_status(&self, _id: JobId, status: JobStatus) -> Result<(), RepositoryError> {
        self.statuses.lock().unwrap().push(status);
        Ok(())
    }

    async fn update_result(
        &self,
        _id: JobId,
        _result: &JobResult,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn update_failure(
        &self,
        _id: JobId,
        _error_message: &str,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::QueryFailed("write timeout".to_string()))
    }
}

#[tokio::test]
async fn given_broken_failure_path_then_worker_survives_and_leaves_status_alone() {
    let repository = Arc::new(BrokenFailurePathRepository::default());
    let (dispatch, feed) = dispatch_channel(8);

    dispatch.publish(JobId::new()).await.unwrap();
    drop(dispatch);

    JobWorker::new(feed, repository.clone(), Arc::new(FailingProcessor))
        .run()
        .await;

    // update_failure failed, so no FAILED transition was attempted.
    let statuses = repository.statuses.lock().unwrap();
    assert!(statuses.is_empty());
}

#[tokio::test]
async fn given_two_workers_then_deliveries_are_load_balanced_not_broadcast() {
    let repository = Arc::new(InMemoryJobRepository::new());
    let processor = Arc::new(CountingProcessor::new());
    let (dispatch, feed) = dispatch_channel(8);

    let a = seed_job(&repository).await;
    let b = seed_job(&repository).await;
    dispatch.publish(a.id).await.unwrap();
    dispatch.publish(b.id).await.unwrap();
    drop(dispatch);

    let first = tokio::spawn(
        JobWorker::new(feed.clone(), repository.clone(), processor.clone()).run(),
    );
    let second = tokio::spawn(
        JobWorker::new(feed, repository.clone(), processor.clone()).run(),
    );
    first.await.unwrap();
    second.await.unwrap();

    // Two deliveries, two completions, no double processing.
    assert_eq!(processor.calls(), 2);
    for id in [a.id, b.id] {
        let done = repository.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(done.status, JobStatus::Completed);
    }
}
