use async_trait::async_trait;

use super::DirectoryError;

/// Existence check for a referenced project.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn exists(&self, project_id: i64) -> Result<bool, DirectoryError>;
}
