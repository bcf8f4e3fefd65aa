use serde::{Deserialize, Serialize};

/// Lifecycle status of a grievance
///
/// # Status Transitions
/// ```text
/// Pending -> InProgress -> Resolved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "grievance_status", rename_all = "snake_case")]
pub enum GrievanceStatus {
    /// Raised by the citizen, waiting for reassignment
    Pending,
    /// Reassigned to a new officer
    InProgress,
    /// Settled by the reassigned officer
    Resolved,
}

impl GrievanceStatus {
    pub fn can_transition_to(&self, next: GrievanceStatus) -> bool {
        use GrievanceStatus::*;
        matches!((self, next), (Pending, InProgress) | (InProgress, Resolved))
    }
}

impl std::fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrievanceStatus::Pending => write!(f, "pending"),
            GrievanceStatus::InProgress => write!(f, "in_progress"),
            GrievanceStatus::Resolved => write!(f, "resolved"),
        }
    }
}
