mod dispatch;
mod job_service;
mod job_worker;

pub use dispatch::{DispatchError, DispatchMessage, JobDispatch, JobFeed, dispatch_channel};
pub use job_service::{JobService, SubmitJobError};
pub use job_worker::{JobWorker, JobWorkerError};
