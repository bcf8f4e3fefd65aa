// Application services
// Load aggregates, apply a domain transition, commit it with its notifications

pub mod bootstrap;
pub mod complaints;
pub mod grievances;

pub use complaints::{ComplaintService, FileComplaint};
pub use grievances::GrievanceService;
