use async_trait::async_trait;
use uuid::Uuid;

use super::user_repository::User;
use crate::domain::errors::RepositoryResult;
use crate::domain::officer::{ApprovalStatus, Officer};

/// Repository trait for officer profiles
#[async_trait]
pub trait OfficerRepository: Send + Sync {
    /// Create the officer's user account and profile together
    async fn create(&self, user: &User, officer: &Officer) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Officer>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Officer>>;

    async fn find_by_approval(&self, approval: ApprovalStatus) -> RepositoryResult<Vec<Officer>>;

    async fn find_by_department(&self, department_id: Uuid) -> RepositoryResult<Vec<Officer>>;

    /// Persist approval and proof document changes
    async fn save(&self, officer: &Officer) -> RepositoryResult<()>;

    /// Soft delete the profile and its user account
    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()>;
}
