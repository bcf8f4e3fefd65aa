use super::events::GrievanceEvent;
use super::value_objects::GrievanceStatus;
use crate::domain::complaint::Complaint;
use crate::domain::errors::{DomainError, DomainResult, Validator};
use crate::domain::officer::Officer;
use crate::domain::user::Actor;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const REASON_MAX: usize = 2000;

/// Flat persistence shape of a grievance
#[derive(Debug, Clone)]
pub struct GrievanceRecord {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub citizen_id: Uuid,
    pub originating_officer_id: Uuid,
    pub reassigned_officer_id: Option<Uuid>,
    pub reason: String,
    pub image_path: Option<String>,
    pub status: GrievanceStatus,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Grievance aggregate root
///
/// Every operation takes the originating complaint so that the complaint's
/// status moves together with the grievance.
///
/// # Invariants
/// - Raised only by the filing citizen, on a Resolved complaint, once
/// - The reassigned officer differs from the originating officer
/// - Only the reassigned officer resolves it
#[derive(Debug, Clone)]
pub struct Grievance {
    id: Uuid,
    complaint_id: Uuid,
    citizen_id: Uuid,
    originating_officer_id: Uuid,
    reassigned_officer_id: Option<Uuid>,
    reason: String,
    image_path: Option<String>,
    status: GrievanceStatus,
    resolution_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl Grievance {
    /// Raises a grievance against a resolved complaint
    pub fn raise(
        complaint: &mut Complaint,
        actor: &Actor,
        reason: String,
    ) -> DomainResult<(Self, GrievanceEvent)> {
        let originating_officer_id = complaint.ensure_grievance_allowed(actor)?;
        Validator::new().text("reason", &reason, REASON_MAX).finish()?;

        let now = Utc::now();
        let grievance = Self {
            id: Uuid::new_v4(),
            complaint_id: complaint.id(),
            citizen_id: complaint.citizen_id(),
            originating_officer_id,
            reassigned_officer_id: None,
            reason: reason.trim().to_string(),
            image_path: None,
            status: GrievanceStatus::Pending,
            resolution_note: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };
        complaint.attach_grievance(grievance.id);

        let event = GrievanceEvent::Raised {
            grievance_id: grievance.id,
            complaint_id: grievance.complaint_id,
            citizen_id: grievance.citizen_id,
            originating_officer_id,
        };

        Ok((grievance, event))
    }

    /// Hands the grievance and its complaint to a different officer
    pub fn reassign(
        &mut self,
        complaint: &mut Complaint,
        actor: &Actor,
        officer: &Officer,
    ) -> DomainResult<GrievanceEvent> {
        if !actor.is_admin() {
            return Err(DomainError::forbidden(
                "Only administrators may reassign grievances",
            ));
        }
        self.ensure_owns(complaint)?;
        self.ensure_can_transition(GrievanceStatus::InProgress)?;
        if officer.id == self.originating_officer_id {
            return Err(DomainError::invalid_field(
                "officer_id",
                "Grievance must be reassigned to a different officer",
            ));
        }
        officer.ensure_assignable_to(complaint.department_id())?;

        complaint.reopen_for(officer.id, actor.user_id)?;

        self.status = GrievanceStatus::InProgress;
        self.reassigned_officer_id = Some(officer.id);
        self.updated_at = Utc::now();

        Ok(GrievanceEvent::Reassigned {
            grievance_id: self.id,
            complaint_id: self.complaint_id,
            citizen_id: self.citizen_id,
            officer_id: officer.id,
        })
    }

    /// The reassigned officer settles the grievance; the complaint returns
    /// to Resolved
    pub fn resolve(
        &mut self,
        complaint: &mut Complaint,
        actor: &Actor,
        note: Option<String>,
    ) -> DomainResult<GrievanceEvent> {
        match self.reassigned_officer_id {
            Some(officer_id) if actor.is_officer(officer_id) => {}
            _ => {
                return Err(DomainError::forbidden(
                    "Only the reassigned officer may resolve this grievance",
                ))
            }
        }
        self.ensure_owns(complaint)?;
        self.ensure_can_transition(GrievanceStatus::Resolved)?;

        let note = note.filter(|n| !n.trim().is_empty());
        complaint.resolve_after_grievance(note.clone())?;

        let now = Utc::now();
        self.status = GrievanceStatus::Resolved;
        self.resolution_note = note;
        self.resolved_at = Some(now);
        self.updated_at = now;

        Ok(GrievanceEvent::Resolved {
            grievance_id: self.id,
            complaint_id: self.complaint_id,
            citizen_id: self.citizen_id,
            originating_officer_id: self.originating_officer_id,
        })
    }

    /// Stores a new image path, returning the one it replaces
    pub fn set_image(&mut self, actor: &Actor, path: String) -> DomainResult<Option<String>> {
        if !actor.is_citizen(self.citizen_id) {
            return Err(DomainError::forbidden(
                "Only the citizen who raised the grievance may upload its image",
            ));
        }
        let previous = self.image_path.replace(path);
        self.updated_at = Utc::now();
        Ok(previous)
    }

    /// Admins, the raising citizen and both officers involved may read it
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        actor.is_admin()
            || actor.is_citizen(self.citizen_id)
            || actor.is_officer(self.originating_officer_id)
            || self
                .reassigned_officer_id
                .is_some_and(|officer_id| actor.is_officer(officer_id))
    }

    fn ensure_owns(&self, complaint: &Complaint) -> DomainResult<()> {
        if complaint.id() != self.complaint_id {
            return Err(DomainError::conflict(format!(
                "Grievance {} does not belong to complaint {}",
                self.id,
                complaint.id()
            )));
        }
        Ok(())
    }

    fn ensure_can_transition(&self, next: GrievanceStatus) -> DomainResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(self.status, next))
        }
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn complaint_id(&self) -> Uuid {
        self.complaint_id
    }

    pub fn citizen_id(&self) -> Uuid {
        self.citizen_id
    }

    pub fn originating_officer_id(&self) -> Uuid {
        self.originating_officer_id
    }

    pub fn reassigned_officer_id(&self) -> Option<Uuid> {
        self.reassigned_officer_id
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn status(&self) -> GrievanceStatus {
        self.status
    }

    pub fn resolution_note(&self) -> Option<&str> {
        self.resolution_note.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Reconstructs a Grievance from persistence layer data
    pub fn from_persistence(record: GrievanceRecord) -> Self {
        Self {
            id: record.id,
            complaint_id: record.complaint_id,
            citizen_id: record.citizen_id,
            originating_officer_id: record.originating_officer_id,
            reassigned_officer_id: record.reassigned_officer_id,
            reason: record.reason,
            image_path: record.image_path,
            status: record.status,
            resolution_note: record.resolution_note,
            created_at: record.created_at,
            updated_at: record.updated_at,
            resolved_at: record.resolved_at,
        }
    }
}
