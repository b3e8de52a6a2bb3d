mod health;
mod job_status;
mod jobs_by_user;
mod submit_job;

pub use health::health_handler;
pub use job_status::job_status_handler;
pub use jobs_by_user::jobs_by_user_handler;
pub use submit_job::submit_job_handler;
