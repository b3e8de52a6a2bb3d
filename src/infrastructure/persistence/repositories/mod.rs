mod in_memory_repository;
mod pg_job_repository;

pub use in_memory_repository::InMemoryJobRepository;
pub use pg_job_repository::PgJobRepository;
