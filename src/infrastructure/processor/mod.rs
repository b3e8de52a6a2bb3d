mod http_job_processor;

pub use http_job_processor::HttpJobProcessor;
