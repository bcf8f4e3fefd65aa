// Notifications fanned out from complaint and grievance events

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::complaint::ComplaintEvent;
use super::grievance::GrievanceEvent;
use super::user::{Actor, Role};

/// A message for one officer or citizen, optionally linked to the
/// complaint and grievance it is about
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub officer_id: Option<Uuid>,
    pub citizen_id: Option<Uuid>,
    pub complaint_id: Option<Uuid>,
    pub grievance_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Who a notification is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Officer(Uuid),
    Citizen(Uuid),
}

impl Notification {
    pub fn new(
        recipient: Recipient,
        complaint_id: Option<Uuid>,
        grievance_id: Option<Uuid>,
        message: impl Into<String>,
    ) -> Self {
        let (officer_id, citizen_id) = match recipient {
            Recipient::Officer(id) => (Some(id), None),
            Recipient::Citizen(id) => (None, Some(id)),
        };
        Self {
            id: Uuid::new_v4(),
            officer_id,
            citizen_id,
            complaint_id,
            grievance_id,
            message: message.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// True when the notification is addressed to `actor`
    pub fn belongs_to(&self, actor: &Actor) -> bool {
        match actor.role {
            Role::Officer => self.officer_id == Some(actor.user_id),
            Role::Citizen => self.citizen_id == Some(actor.user_id),
            Role::Admin => false,
        }
    }

    /// Notifications produced by a complaint transition
    pub fn for_complaint_event(event: &ComplaintEvent) -> Vec<Notification> {
        let complaint = Some(event.complaint_id());
        match *event {
            ComplaintEvent::Filed { citizen_id, .. } => vec![Notification::new(
                Recipient::Citizen(citizen_id),
                complaint,
                None,
                "Your complaint has been filed",
            )],
            ComplaintEvent::Assigned {
                citizen_id,
                officer_id,
                previous_officer_id,
                ..
            } => {
                let mut out = vec![
                    Notification::new(
                        Recipient::Officer(officer_id),
                        complaint,
                        None,
                        "A complaint has been assigned to you",
                    ),
                    Notification::new(
                        Recipient::Citizen(citizen_id),
                        complaint,
                        None,
                        "An officer has been assigned to your complaint",
                    ),
                ];
                if let Some(previous) = previous_officer_id {
                    out.push(Notification::new(
                        Recipient::Officer(previous),
                        complaint,
                        None,
                        "A complaint has been reassigned to another officer",
                    ));
                }
                out
            }
            ComplaintEvent::Started { citizen_id, .. } => vec![Notification::new(
                Recipient::Citizen(citizen_id),
                complaint,
                None,
                "Work on your complaint has started",
            )],
            ComplaintEvent::Resolved { citizen_id, .. } => vec![Notification::new(
                Recipient::Citizen(citizen_id),
                complaint,
                None,
                "Your complaint has been marked resolved",
            )],
            ComplaintEvent::Closed { officer_id, .. } => officer_id
                .map(|officer_id| {
                    Notification::new(
                        Recipient::Officer(officer_id),
                        complaint,
                        None,
                        "The citizen accepted your resolution and closed the complaint",
                    )
                })
                .into_iter()
                .collect(),
        }
    }

    /// Notifications produced by a grievance transition
    pub fn for_grievance_event(event: &GrievanceEvent) -> Vec<Notification> {
        match *event {
            GrievanceEvent::Raised {
                grievance_id,
                complaint_id,
                originating_officer_id,
                ..
            } => vec![Notification::new(
                Recipient::Officer(originating_officer_id),
                Some(complaint_id),
                Some(grievance_id),
                "A grievance was raised against your resolution",
            )],
            GrievanceEvent::Reassigned {
                grievance_id,
                complaint_id,
                citizen_id,
                officer_id,
            } => vec![
                Notification::new(
                    Recipient::Officer(officer_id),
                    Some(complaint_id),
                    Some(grievance_id),
                    "A grievance has been assigned to you",
                ),
                Notification::new(
                    Recipient::Citizen(citizen_id),
                    Some(complaint_id),
                    Some(grievance_id),
                    "Your grievance has been assigned to a new officer",
                ),
            ],
            GrievanceEvent::Resolved {
                grievance_id,
                complaint_id,
                citizen_id,
                originating_officer_id,
            } => vec![
                Notification::new(
                    Recipient::Citizen(citizen_id),
                    Some(complaint_id),
                    Some(grievance_id),
                    "Your grievance has been resolved",
                ),
                Notification::new(
                    Recipient::Officer(originating_officer_id),
                    Some(complaint_id),
                    Some(grievance_id),
                    "A grievance against your resolution was resolved",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_notifies_officer_and_citizen() {
        let event = ComplaintEvent::Assigned {
            complaint_id: Uuid::new_v4(),
            citizen_id: Uuid::new_v4(),
            officer_id: Uuid::new_v4(),
            previous_officer_id: None,
        };

        let out = Notification::for_complaint_event(&event);

        assert_eq!(out.len(), 2);
        assert!(out[0].officer_id.is_some());
        assert!(out[1].citizen_id.is_some());
        assert!(out.iter().all(|n| n.complaint_id == Some(event.complaint_id())));
    }

    #[test]
    fn replacing_officer_also_notifies_previous_one() {
        let previous = Uuid::new_v4();
        let event = ComplaintEvent::Assigned {
            complaint_id: Uuid::new_v4(),
            citizen_id: Uuid::new_v4(),
            officer_id: Uuid::new_v4(),
            previous_officer_id: Some(previous),
        };

        let out = Notification::for_complaint_event(&event);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].officer_id, Some(previous));
    }

    #[test]
    fn closing_without_officer_notifies_nobody() {
        let event = ComplaintEvent::Closed {
            complaint_id: Uuid::new_v4(),
            officer_id: None,
        };
        assert!(Notification::for_complaint_event(&event).is_empty());
    }

    #[test]
    fn grievance_notifications_link_grievance() {
        let grievance_id = Uuid::new_v4();
        let event = GrievanceEvent::Resolved {
            grievance_id,
            complaint_id: Uuid::new_v4(),
            citizen_id: Uuid::new_v4(),
            originating_officer_id: Uuid::new_v4(),
        };

        let out = Notification::for_grievance_event(&event);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|n| n.grievance_id == Some(grievance_id)));
    }

    #[test]
    fn ownership_matches_role_and_id() {
        let citizen = Uuid::new_v4();
        let notification = Notification::new(Recipient::Citizen(citizen), None, None, "hi");

        assert!(notification.belongs_to(&Actor::new(citizen, Role::Citizen)));
        assert!(!notification.belongs_to(&Actor::new(citizen, Role::Officer)));
        assert!(!notification.belongs_to(&Actor::new(citizen, Role::Admin)));
    }
}
