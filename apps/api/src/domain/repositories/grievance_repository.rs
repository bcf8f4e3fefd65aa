use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::complaint::Complaint;
use crate::domain::errors::RepositoryResult;
use crate::domain::grievance::Grievance;
use crate::domain::notification::Notification;

/// Repository trait for the Grievance aggregate
#[async_trait]
pub trait GrievanceRepository: Send + Sync {
    /// Insert a new grievance; a second live grievance for the same
    /// complaint is a conflict
    async fn create(
        &self,
        grievance: &Grievance,
        notifications: &[Notification],
    ) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Grievance>>;

    async fn find_by_complaint(&self, complaint_id: Uuid) -> RepositoryResult<Option<Grievance>>;

    async fn find_all(&self) -> RepositoryResult<Vec<Grievance>>;

    async fn find_by_citizen(&self, citizen_id: Uuid) -> RepositoryResult<Vec<Grievance>>;

    /// Grievances where the officer is the originating or reassigned officer
    async fn find_by_officer(&self, officer_id: Uuid) -> RepositoryResult<Vec<Grievance>>;

    /// Persist the grievance and, when given, its complaint in one unit
    async fn save(
        &self,
        grievance: &Grievance,
        complaint: Option<&Complaint>,
        notifications: &[Notification],
    ) -> RepositoryResult<()>;
}
