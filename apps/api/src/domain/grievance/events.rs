use uuid::Uuid;

/// Domain events emitted by the Grievance aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrievanceEvent {
    /// The citizen disputed a resolution
    Raised {
        grievance_id: Uuid,
        complaint_id: Uuid,
        citizen_id: Uuid,
        originating_officer_id: Uuid,
    },
    /// An administrator handed the grievance (and its complaint) to a new officer
    Reassigned {
        grievance_id: Uuid,
        complaint_id: Uuid,
        citizen_id: Uuid,
        officer_id: Uuid,
    },
    /// The reassigned officer settled the grievance
    Resolved {
        grievance_id: Uuid,
        complaint_id: Uuid,
        citizen_id: Uuid,
        originating_officer_id: Uuid,
    },
}

impl GrievanceEvent {
    pub fn grievance_id(&self) -> Uuid {
        match self {
            GrievanceEvent::Raised { grievance_id, .. }
            | GrievanceEvent::Reassigned { grievance_id, .. }
            | GrievanceEvent::Resolved { grievance_id, .. } => *grievance_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GrievanceEvent::Raised { .. } => "grievance_raised",
            GrievanceEvent::Reassigned { .. } => "grievance_reassigned",
            GrievanceEvent::Resolved { .. } => "grievance_resolved",
        }
    }
}
