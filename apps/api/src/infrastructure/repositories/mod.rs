// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod memory;
pub mod postgres_complaint_repository;
pub mod postgres_grievance_repository;
pub mod postgres_notification_repository;
pub mod postgres_officer_repository;
pub mod postgres_taxonomy_repository;
pub mod postgres_user_repository;

pub use memory::InMemoryStore;
pub use postgres_complaint_repository::PostgresComplaintRepository;
pub use postgres_grievance_repository::PostgresGrievanceRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_officer_repository::PostgresOfficerRepository;
pub use postgres_taxonomy_repository::PostgresTaxonomyRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::errors::RepositoryError;

/// Maps a sqlx error into a repository error, keeping constraint
/// violations distinguishable so the API can answer 409
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepositoryError::Conflict(format!("{}: duplicate record", context));
        }
        if db.is_foreign_key_violation() {
            return RepositoryError::Conflict(format!("{}: referenced record missing", context));
        }
    }
    tracing::error!(error = %err, "{}", context);
    RepositoryError::Backend(format!("{}: {}", context, err))
}
