// Complaint domain module
// Contains the complaint aggregate root, its status lifecycle and domain events

#![allow(clippy::module_inception)]

pub mod complaint;
pub mod events;
pub mod value_objects;

// Re-export main types for convenience
pub use complaint::{Complaint, ComplaintRecord, NewComplaint};
pub use events::ComplaintEvent;
pub use value_objects::{ComplaintAssignment, ComplaintStatus};

#[cfg(test)]
pub(crate) use complaint::fixtures;
