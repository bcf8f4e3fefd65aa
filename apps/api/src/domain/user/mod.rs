// User domain module
// Accounts, roles and the authenticated actor

pub mod value_objects;

pub use value_objects::{Actor, Email, Role};
