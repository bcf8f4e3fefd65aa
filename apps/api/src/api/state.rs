use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::repositories::{
    ComplaintRepository, GrievanceRepository, NotificationRepository, OfficerRepository,
    TaxonomyRepository, UserRepository,
};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresComplaintRepository, PostgresGrievanceRepository,
    PostgresNotificationRepository, PostgresOfficerRepository, PostgresTaxonomyRepository,
    PostgresUserRepository,
};
use crate::infrastructure::uploads::FileStore;
use crate::services::{ComplaintService, GrievanceService};

/// Shared handler state: repositories behind their ports, upload storage
/// and the token signing secret
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub officers: Arc<dyn OfficerRepository>,
    pub taxonomy: Arc<dyn TaxonomyRepository>,
    pub complaints: Arc<dyn ComplaintRepository>,
    pub grievances: Arc<dyn GrievanceRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub uploads: FileStore,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn postgres(pool: PgPool, uploads: FileStore, jwt_secret: &str) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            officers: Arc::new(PostgresOfficerRepository::new(pool.clone())),
            taxonomy: Arc::new(PostgresTaxonomyRepository::new(pool.clone())),
            complaints: Arc::new(PostgresComplaintRepository::new(pool.clone())),
            grievances: Arc::new(PostgresGrievanceRepository::new(pool.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(pool)),
            uploads,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    /// State backed by a single in-process store; used by the HTTP tests
    pub fn in_memory(uploads: FileStore, jwt_secret: &str) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            officers: store.clone(),
            taxonomy: store.clone(),
            complaints: store.clone(),
            grievances: store.clone(),
            notifications: store,
            uploads,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    pub fn complaint_service(&self) -> ComplaintService {
        ComplaintService::new(
            self.complaints.clone(),
            self.grievances.clone(),
            self.officers.clone(),
            self.taxonomy.clone(),
        )
    }

    pub fn grievance_service(&self) -> GrievanceService {
        GrievanceService::new(
            self.grievances.clone(),
            self.complaints.clone(),
            self.officers.clone(),
        )
    }
}
