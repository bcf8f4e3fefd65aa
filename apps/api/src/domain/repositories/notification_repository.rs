use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::notification::{Notification, Recipient};

/// Repository trait for notifications
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Live notifications for a recipient, newest first
    async fn find_for(&self, recipient: Recipient) -> RepositoryResult<Vec<Notification>>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Notification>>;

    async fn mark_read(&self, id: Uuid) -> RepositoryResult<()>;

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()>;
}
