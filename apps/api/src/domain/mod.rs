// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod complaint;
pub mod errors;
pub mod grievance;
pub mod notification;
pub mod officer;
pub mod repositories;
pub mod taxonomy;
pub mod user;
