//! CivicTrack API Library
//!
//! Complaint and grievance tracking for civic departments: domain rules,
//! application services, PostgreSQL adapters and the HTTP layer.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
