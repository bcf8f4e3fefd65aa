use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the lifecycle status of a complaint
///
/// # Status Transitions
/// ```text
/// Pending -> InProgress -> Resolved -> Closed
///                ^             |
///                +-------------+  (grievance reassignment)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
pub enum ComplaintStatus {
    /// Filed, waiting for an officer to take it up
    Pending,
    /// The assigned officer is working on it
    InProgress,
    /// The assigned officer reports it resolved
    Resolved,
    /// The citizen accepted the resolution
    Closed,
}

impl ComplaintStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Valid Transitions
    /// - Pending -> InProgress
    /// - InProgress -> Resolved
    /// - Resolved -> Closed
    /// - Resolved -> InProgress (only through a grievance reassignment)
    ///
    /// # Example
    /// ```
    /// use civictrack_api::domain::complaint::ComplaintStatus;
    ///
    /// assert!(ComplaintStatus::Pending.can_transition_to(ComplaintStatus::InProgress));
    /// assert!(!ComplaintStatus::Pending.can_transition_to(ComplaintStatus::Resolved));
    /// ```
    pub fn can_transition_to(&self, next: ComplaintStatus) -> bool {
        use ComplaintStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (InProgress, Resolved)
                | (Resolved, Closed)
                | (Resolved, InProgress)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ComplaintStatus::Closed)
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplaintStatus::Pending => write!(f, "pending"),
            ComplaintStatus::InProgress => write!(f, "in_progress"),
            ComplaintStatus::Resolved => write!(f, "resolved"),
            ComplaintStatus::Closed => write!(f, "closed"),
        }
    }
}

/// The active link between an officer and a complaint
///
/// Identity is the pair (officer_id, complaint_id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplaintAssignment {
    pub officer_id: Uuid,
    pub complaint_id: Uuid,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<Utc>,
}
