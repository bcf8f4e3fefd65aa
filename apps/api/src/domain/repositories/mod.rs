// Repository ports
// Persistence contracts implemented by the infrastructure adapters

pub mod complaint_repository;
pub mod grievance_repository;
pub mod notification_repository;
pub mod officer_repository;
pub mod taxonomy_repository;
pub mod user_repository;

pub use complaint_repository::ComplaintRepository;
pub use grievance_repository::GrievanceRepository;
pub use notification_repository::NotificationRepository;
pub use officer_repository::OfficerRepository;
pub use taxonomy_repository::TaxonomyRepository;
pub use user_repository::{User, UserRepository};
