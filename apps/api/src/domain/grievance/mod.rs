// Grievance domain module
// Citizen escalation of a disputed complaint resolution

#![allow(clippy::module_inception)]

pub mod events;
pub mod grievance;
pub mod value_objects;

pub use events::GrievanceEvent;
pub use grievance::{Grievance, GrievanceRecord};
pub use value_objects::GrievanceStatus;
