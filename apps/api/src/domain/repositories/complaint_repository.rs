use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::complaint::Complaint;
use crate::domain::errors::RepositoryResult;
use crate::domain::notification::Notification;

/// Repository trait for the Complaint aggregate
///
/// Writes persist the complaint, its active assignment and the
/// notifications of the transition atomically. Reads never return
/// soft-deleted complaints.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    async fn create(
        &self,
        complaint: &Complaint,
        notifications: &[Notification],
    ) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Complaint>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Complaint>>;

    async fn find_by_citizen(&self, citizen_id: Uuid) -> RepositoryResult<Vec<Complaint>>;

    /// Complaints whose active assignment belongs to the officer
    async fn find_by_officer(&self, officer_id: Uuid) -> RepositoryResult<Vec<Complaint>>;

    /// Persist status, assignment and image changes
    async fn save(
        &self,
        complaint: &Complaint,
        notifications: &[Notification],
    ) -> RepositoryResult<()>;

    /// Soft delete the complaint with its assignments and grievance
    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()>;
}
