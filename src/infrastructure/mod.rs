pub mod directory;
pub mod observability;
pub mod persistence;
pub mod processor;
