mod job_processor;
mod job_repository;
mod project_directory;
mod repository_error;
mod user_directory;

pub use job_processor::{JobProcessor, ProcessorError};
pub use job_repository::JobRepository;
pub use project_directory::ProjectDirectory;
pub use repository_error::RepositoryError;
pub use user_directory::{DirectoryError, UserDirectory};
