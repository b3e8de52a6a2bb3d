use std::collections::HashSet;

use async_trait::async_trait;

use crate::application::ports::{DirectoryError, ProjectDirectory, UserDirectory};

/// Stand-in for the real account service: accepts any positive identifier,
/// or only an explicit allowlist when one is configured.
pub struct StubUserDirectory {
    allowed: Option<HashSet<i64>>,
}

impl StubUserDirectory {
    pub fn allow_all() -> Self {
        Self { allowed: None }
    }

    pub fn with_users(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allowed: Some(ids.into_iter().collect()),
        }
    }
}

#[async_trait]
impl UserDirectory for StubUserDirectory {
    async fn exists(&self, user_id: i64) -> Result<bool, DirectoryError> {
        Ok(match &self.allowed {
            Some(ids) => ids.contains(&user_id),
            None => user_id > 0,
        })
    }
}

/// Stand-in for the real project service, same allowlist behavior.
pub struct StubProjectDirectory {
    allowed: Option<HashSet<i64>>,
}

impl StubProjectDirectory {
    pub fn allow_all() -> Self {
        Self { allowed: None }
    }

    pub fn with_projects(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allowed: Some(ids.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ProjectDirectory for StubProjectDirectory {
    async fn exists(&self, project_id: i64) -> Result<bool, DirectoryError> {
        Ok(match &self.allowed {
            Some(ids) => ids.contains(&project_id),
            None => project_id > 0,
        })
    }
}
