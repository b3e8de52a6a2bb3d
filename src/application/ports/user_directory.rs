use async_trait::async_trait;

/// Existence check for the submitting principal.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, user_id: i64) -> Result<bool, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory lookup failed: {0}")]
    LookupFailed(String),
}
