use uuid::Uuid;

/// Domain events that occur within the Complaint aggregate
///
/// Each event is fanned out into notifications by the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintEvent {
    /// A citizen filed a new complaint
    Filed {
        complaint_id: Uuid,
        citizen_id: Uuid,
    },
    /// An administrator assigned (or replaced) the responsible officer
    Assigned {
        complaint_id: Uuid,
        citizen_id: Uuid,
        officer_id: Uuid,
        previous_officer_id: Option<Uuid>,
    },
    /// The assigned officer started work
    Started {
        complaint_id: Uuid,
        citizen_id: Uuid,
        officer_id: Uuid,
    },
    /// The assigned officer marked the complaint resolved
    Resolved {
        complaint_id: Uuid,
        citizen_id: Uuid,
        officer_id: Uuid,
    },
    /// The citizen accepted the resolution
    Closed {
        complaint_id: Uuid,
        officer_id: Option<Uuid>,
    },
}

impl ComplaintEvent {
    /// Returns the complaint_id for this event
    pub fn complaint_id(&self) -> Uuid {
        match self {
            ComplaintEvent::Filed { complaint_id, .. }
            | ComplaintEvent::Assigned { complaint_id, .. }
            | ComplaintEvent::Started { complaint_id, .. }
            | ComplaintEvent::Resolved { complaint_id, .. }
            | ComplaintEvent::Closed { complaint_id, .. } => *complaint_id,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ComplaintEvent::Filed { .. } => "filed",
            ComplaintEvent::Assigned { .. } => "assigned",
            ComplaintEvent::Started { .. } => "started",
            ComplaintEvent::Resolved { .. } => "resolved",
            ComplaintEvent::Closed { .. } => "closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complaint_id_is_exposed_for_every_variant() {
        let complaint_id = Uuid::new_v4();
        let citizen_id = Uuid::new_v4();
        let officer_id = Uuid::new_v4();

        let events = [
            ComplaintEvent::Filed {
                complaint_id,
                citizen_id,
            },
            ComplaintEvent::Assigned {
                complaint_id,
                citizen_id,
                officer_id,
                previous_officer_id: None,
            },
            ComplaintEvent::Started {
                complaint_id,
                citizen_id,
                officer_id,
            },
            ComplaintEvent::Resolved {
                complaint_id,
                citizen_id,
                officer_id,
            },
            ComplaintEvent::Closed {
                complaint_id,
                officer_id: Some(officer_id),
            },
        ];

        for event in events {
            assert_eq!(event.complaint_id(), complaint_id);
        }
    }
}
