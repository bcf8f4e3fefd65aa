// Infrastructure layer module
// Contains database adapters, the upload store and other external integrations
// Follows Hexagonal Architecture

pub mod repositories;
pub mod uploads;
