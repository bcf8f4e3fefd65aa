use super::events::ComplaintEvent;
use super::value_objects::{ComplaintAssignment, ComplaintStatus};
use crate::domain::errors::{DomainError, DomainResult, Validator};
use crate::domain::grievance::{Grievance, GrievanceStatus};
use crate::domain::officer::Officer;
use crate::domain::user::Actor;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 4000;

/// Input for filing a complaint
///
/// Department and category ids must already be checked against the
/// taxonomy by the caller.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub citizen_id: Uuid,
    pub department_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
}

/// Flat persistence shape of a complaint, used by repository adapters
#[derive(Debug, Clone)]
pub struct ComplaintRecord {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub department_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub image_path: Option<String>,
    pub status: ComplaintStatus,
    pub resolution_note: Option<String>,
    pub assignment: Option<ComplaintAssignment>,
    pub grievance_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Complaint aggregate root
///
/// Owns the complaint status lifecycle and its active officer assignment.
///
/// # Invariants
/// - Title and description are never empty
/// - Only the assigned officer moves Pending -> InProgress -> Resolved
/// - Resolved is only reachable from InProgress
/// - Only the filing citizen closes the complaint or raises a grievance
/// - At most one active assignment and at most one grievance
/// - Once a grievance is raised, only settling it resolves the complaint,
///   and the complaint stays open until it is settled
#[derive(Debug, Clone)]
pub struct Complaint {
    id: Uuid,
    citizen_id: Uuid,
    department_id: Uuid,
    category_id: Uuid,
    title: String,
    description: String,
    location: Option<String>,
    image_path: Option<String>,
    status: ComplaintStatus,
    resolution_note: Option<String>,
    assignment: Option<ComplaintAssignment>,
    grievance_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
}

impl Complaint {
    /// Files a new complaint in Pending status
    ///
    /// # Example
    /// ```
    /// use civictrack_api::domain::complaint::{Complaint, ComplaintStatus, NewComplaint};
    /// use uuid::Uuid;
    ///
    /// let (complaint, _event) = Complaint::file(NewComplaint {
    ///     citizen_id: Uuid::new_v4(),
    ///     department_id: Uuid::new_v4(),
    ///     category_id: Uuid::new_v4(),
    ///     title: "Broken street light".to_string(),
    ///     description: "Dark since Monday".to_string(),
    ///     location: None,
    /// })
    /// .expect("valid complaint");
    ///
    /// assert_eq!(complaint.status(), ComplaintStatus::Pending);
    /// ```
    pub fn file(input: NewComplaint) -> DomainResult<(Self, ComplaintEvent)> {
        Validator::new()
            .text("title", &input.title, TITLE_MAX)
            .text("description", &input.description, DESCRIPTION_MAX)
            .finish()?;

        let now = Utc::now();
        let complaint = Self {
            id: Uuid::new_v4(),
            citizen_id: input.citizen_id,
            department_id: input.department_id,
            category_id: input.category_id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            location: input.location.filter(|l| !l.trim().is_empty()),
            image_path: None,
            status: ComplaintStatus::Pending,
            resolution_note: None,
            assignment: None,
            grievance_id: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            closed_at: None,
        };

        let event = ComplaintEvent::Filed {
            complaint_id: complaint.id,
            citizen_id: complaint.citizen_id,
        };

        Ok((complaint, event))
    }

    /// Assigns an officer to a pending complaint, replacing any earlier one
    ///
    /// # Business Rules
    /// - Only administrators assign
    /// - Complaint must still be Pending
    /// - Officer must be approved and in the complaint's department
    pub fn assign(&mut self, actor: &Actor, officer: &Officer) -> DomainResult<ComplaintEvent> {
        if !actor.is_admin() {
            return Err(DomainError::forbidden(
                "Only administrators may assign complaints",
            ));
        }
        if self.status != ComplaintStatus::Pending {
            return Err(DomainError::conflict(format!(
                "Cannot assign complaint in {} status",
                self.status
            )));
        }
        officer.ensure_assignable_to(self.department_id)?;

        let previous_officer_id = self.assigned_officer_id();
        if previous_officer_id == Some(officer.id) {
            return Err(DomainError::conflict(format!(
                "Officer {} is already assigned to this complaint",
                officer.id
            )));
        }

        self.set_assignment(officer.id, actor.user_id);

        Ok(ComplaintEvent::Assigned {
            complaint_id: self.id,
            citizen_id: self.citizen_id,
            officer_id: officer.id,
            previous_officer_id,
        })
    }

    /// The assigned officer takes the complaint up (Pending -> InProgress)
    pub fn start(&mut self, actor: &Actor) -> DomainResult<ComplaintEvent> {
        let officer_id = self.ensure_assigned_officer(actor)?;
        if self.status != ComplaintStatus::Pending {
            return Err(DomainError::invalid_transition(
                self.status,
                ComplaintStatus::InProgress,
            ));
        }
        self.transition(ComplaintStatus::InProgress)?;

        Ok(ComplaintEvent::Started {
            complaint_id: self.id,
            citizen_id: self.citizen_id,
            officer_id,
        })
    }

    /// The assigned officer marks the work done (InProgress -> Resolved)
    pub fn resolve(
        &mut self,
        actor: &Actor,
        note: Option<String>,
    ) -> DomainResult<ComplaintEvent> {
        let officer_id = self.ensure_assigned_officer(actor)?;
        if self.grievance_id.is_some() {
            return Err(DomainError::conflict(
                "Complaint is under grievance; resolve the grievance instead",
            ));
        }
        self.transition(ComplaintStatus::Resolved)?;
        self.resolution_note = note.filter(|n| !n.trim().is_empty());

        Ok(ComplaintEvent::Resolved {
            complaint_id: self.id,
            citizen_id: self.citizen_id,
            officer_id,
        })
    }

    /// The filing citizen accepts the resolution (Resolved -> Closed)
    ///
    /// `grievance` is the grievance raised against this complaint, if any;
    /// closing is refused until it is Resolved.
    pub fn close(
        &mut self,
        actor: &Actor,
        grievance: Option<&Grievance>,
    ) -> DomainResult<ComplaintEvent> {
        if !actor.is_citizen(self.citizen_id) {
            return Err(DomainError::forbidden(
                "Only the citizen who filed the complaint may close it",
            ));
        }
        if let Some(grievance_id) = self.grievance_id {
            let settled = grievance.is_some_and(|g| {
                g.id() == grievance_id && g.status() == GrievanceStatus::Resolved
            });
            if !settled {
                return Err(DomainError::conflict(
                    "Complaint has an open grievance and cannot be closed yet",
                ));
            }
        }
        self.transition(ComplaintStatus::Closed)?;

        Ok(ComplaintEvent::Closed {
            complaint_id: self.id,
            officer_id: self.assigned_officer_id(),
        })
    }

    /// Checks that `actor` may raise a grievance now and returns the
    /// officer whose resolution is disputed
    pub fn ensure_grievance_allowed(&self, actor: &Actor) -> DomainResult<Uuid> {
        if !actor.is_citizen(self.citizen_id) {
            return Err(DomainError::forbidden(
                "Only the citizen who filed the complaint may raise a grievance",
            ));
        }
        if self.status != ComplaintStatus::Resolved {
            return Err(DomainError::conflict(format!(
                "Grievances can only be raised on resolved complaints (status is {})",
                self.status
            )));
        }
        if self.grievance_id.is_some() {
            return Err(DomainError::conflict(
                "A grievance has already been raised for this complaint",
            ));
        }
        self.assigned_officer_id().ok_or_else(|| {
            DomainError::conflict("Resolved complaint has no assigned officer")
        })
    }

    /// Records the grievance raised against this complaint
    pub(crate) fn attach_grievance(&mut self, grievance_id: Uuid) {
        self.grievance_id = Some(grievance_id);
        self.updated_at = Utc::now();
    }

    /// Hands a disputed complaint to a new officer (Resolved -> InProgress)
    pub(crate) fn reopen_for(&mut self, officer_id: Uuid, assigned_by: Uuid) -> DomainResult<()> {
        if self.status != ComplaintStatus::Resolved {
            return Err(DomainError::invalid_transition(
                self.status,
                ComplaintStatus::InProgress,
            ));
        }
        self.transition(ComplaintStatus::InProgress)?;
        self.set_assignment(officer_id, assigned_by);
        self.resolved_at = None;
        Ok(())
    }

    /// Marks the complaint resolved again after its grievance is settled
    pub(crate) fn resolve_after_grievance(&mut self, note: Option<String>) -> DomainResult<()> {
        self.transition(ComplaintStatus::Resolved)?;
        if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
            self.resolution_note = Some(note);
        }
        Ok(())
    }

    /// Stores a new image path, returning the one it replaces
    pub fn set_image(&mut self, actor: &Actor, path: String) -> DomainResult<Option<String>> {
        if !actor.is_citizen(self.citizen_id) {
            return Err(DomainError::forbidden(
                "Only the citizen who filed the complaint may upload its image",
            ));
        }
        let previous = self.image_path.replace(path);
        self.updated_at = Utc::now();
        Ok(previous)
    }

    /// Admins may delete any complaint; citizens only their own pending ones
    pub fn ensure_deletable_by(&self, actor: &Actor) -> DomainResult<()> {
        if actor.is_admin() {
            return Ok(());
        }
        if actor.is_citizen(self.citizen_id) {
            if self.status == ComplaintStatus::Pending {
                return Ok(());
            }
            return Err(DomainError::conflict(
                "Only pending complaints can be withdrawn",
            ));
        }
        Err(DomainError::forbidden("Not allowed to delete this complaint"))
    }

    /// Admins, the filing citizen and the assigned officer may read it
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        actor.is_admin()
            || actor.is_citizen(self.citizen_id)
            || self
                .assigned_officer_id()
                .is_some_and(|officer_id| actor.is_officer(officer_id))
    }

    fn ensure_assigned_officer(&self, actor: &Actor) -> DomainResult<Uuid> {
        match self.assigned_officer_id() {
            Some(officer_id) if actor.is_officer(officer_id) => Ok(officer_id),
            Some(_) => Err(DomainError::forbidden(
                "Only the assigned officer may update this complaint",
            )),
            None => Err(DomainError::conflict("Complaint has no assigned officer")),
        }
    }

    fn set_assignment(&mut self, officer_id: Uuid, assigned_by: Uuid) {
        let now = Utc::now();
        self.assignment = Some(ComplaintAssignment {
            officer_id,
            complaint_id: self.id,
            assigned_by,
            assigned_at: now,
        });
        self.updated_at = now;
    }

    fn transition(&mut self, next: ComplaintStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(self.status, next));
        }

        let now = Utc::now();
        self.status = next;
        self.updated_at = now;
        match next {
            ComplaintStatus::Resolved => self.resolved_at = Some(now),
            ComplaintStatus::Closed => self.closed_at = Some(now),
            _ => {}
        }
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn citizen_id(&self) -> Uuid {
        self.citizen_id
    }

    pub fn department_id(&self) -> Uuid {
        self.department_id
    }

    pub fn category_id(&self) -> Uuid {
        self.category_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    pub fn resolution_note(&self) -> Option<&str> {
        self.resolution_note.as_deref()
    }

    pub fn assignment(&self) -> Option<&ComplaintAssignment> {
        self.assignment.as_ref()
    }

    pub fn assigned_officer_id(&self) -> Option<Uuid> {
        self.assignment.map(|a| a.officer_id)
    }

    pub fn grievance_id(&self) -> Option<Uuid> {
        self.grievance_id
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

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Reconstructs a Complaint from persistence layer data
    ///
    /// Bypasses validation; only repository implementations should call it.
    pub fn from_persistence(record: ComplaintRecord) -> Self {
        Self {
            id: record.id,
            citizen_id: record.citizen_id,
            department_id: record.department_id,
            category_id: record.category_id,
            title: record.title,
            description: record.description,
            location: record.location,
            image_path: record.image_path,
            status: record.status,
            resolution_note: record.resolution_note,
            assignment: record.assignment,
            grievance_id: record.grievance_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            resolved_at: record.resolved_at,
            closed_at: record.closed_at,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::officer::approved_officer;
    use crate::domain::user::Role;

    fn citizen_of(complaint: &Complaint) -> Actor {
        Actor::new(complaint.citizen_id(), Role::Citizen)
    }

    fn officer_actor(officer: &Officer) -> Actor {
        Actor::new(officer.id, Role::Officer)
    }

    #[test]
    fn file_complaint_starts_pending() {
        let complaint = filed();

        assert_eq!(complaint.status(), ComplaintStatus::Pending);
        assert_eq!(complaint.title(), "Overflowing bins");
        assert!(complaint.assignment().is_none());
        assert!(complaint.grievance_id().is_none());
    }

    #[test]
    fn file_complaint_emits_filed_event() {
        let citizen_id = Uuid::new_v4();
        let (complaint, event) = Complaint::file(NewComplaint {
            citizen_id,
            department_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: "Pothole".into(),
            description: "Deep one".into(),
            location: None,
        })
        .unwrap();

        assert_eq!(
            event,
            ComplaintEvent::Filed {
                complaint_id: complaint.id(),
                citizen_id
            }
        );
    }

    #[test]
    fn file_complaint_reports_each_invalid_field() {
        let err = Complaint::file(NewComplaint {
            citizen_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: " ".into(),
            description: "".into(),
            location: None,
        })
        .unwrap_err();

        match err {
            DomainError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["title", "description"]);
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn admin_assigns_approved_officer() {
        let mut complaint = filed();
        let officer = approved_officer(complaint.department_id());

        let event = complaint.assign(&admin(), &officer).unwrap();

        assert_eq!(complaint.assigned_officer_id(), Some(officer.id));
        assert_eq!(complaint.status(), ComplaintStatus::Pending);
        assert!(matches!(
            event,
            ComplaintEvent::Assigned {
                previous_officer_id: None,
                ..
            }
        ));
    }

    #[test]
    fn non_admin_cannot_assign() {
        let mut complaint = filed();
        let officer = approved_officer(complaint.department_id());
        let citizen = citizen_of(&complaint);

        let result = complaint.assign(&citizen, &officer);
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn reassigning_pending_complaint_replaces_officer() {
        let mut complaint = filed();
        let first = approved_officer(complaint.department_id());
        let second = approved_officer(complaint.department_id());

        complaint.assign(&admin(), &first).unwrap();
        let event = complaint.assign(&admin(), &second).unwrap();

        assert_eq!(complaint.assigned_officer_id(), Some(second.id));
        assert!(matches!(
            event,
            ComplaintEvent::Assigned { previous_officer_id: Some(id), .. } if id == first.id
        ));
    }

    #[test]
    fn assigning_same_officer_twice_conflicts() {
        let mut complaint = filed();
        let officer = approved_officer(complaint.department_id());

        complaint.assign(&admin(), &officer).unwrap();
        let result = complaint.assign(&admin(), &officer);
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn cannot_assign_after_work_started() {
        let mut complaint = filed();
        let officer = approved_officer(complaint.department_id());
        complaint.assign(&admin(), &officer).unwrap();
        complaint.start(&officer_actor(&officer)).unwrap();

        let other = approved_officer(complaint.department_id());
        assert!(complaint.assign(&admin(), &other).is_err());
    }

    #[test]
    fn assigned_officer_starts_and_resolves() {
        let mut complaint = filed();
        let officer = approved_officer(complaint.department_id());
        complaint.assign(&admin(), &officer).unwrap();
        let actor = officer_actor(&officer);

        complaint.start(&actor).unwrap();
        assert_eq!(complaint.status(), ComplaintStatus::InProgress);

        complaint.resolve(&actor, Some("Fixed".into())).unwrap();
        assert_eq!(complaint.status(), ComplaintStatus::Resolved);
        assert_eq!(complaint.resolution_note(), Some("Fixed"));
        assert!(complaint.resolved_at().is_some());
    }

    #[test]
    fn cannot_resolve_without_in_progress() {
        let mut complaint = filed();
        let officer = approved_officer(complaint.department_id());
        complaint.assign(&admin(), &officer).unwrap();

        let result = complaint.resolve(&officer_actor(&officer), None);

        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        assert_eq!(complaint.status(), ComplaintStatus::Pending);
    }

    #[test]
    fn cannot_start_without_assignment() {
        let mut complaint = filed();
        let stranger = Actor::new(Uuid::new_v4(), Role::Officer);

        let result = complaint.start(&stranger);
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn other_officer_cannot_start() {
        let mut complaint = filed();
        let officer = approved_officer(complaint.department_id());
        complaint.assign(&admin(), &officer).unwrap();
        let stranger = Actor::new(Uuid::new_v4(), Role::Officer);

        let result = complaint.start(&stranger);
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn citizen_closes_resolved_complaint() {
        let (mut complaint, officer) = resolved();
        let citizen = citizen_of(&complaint);

        let event = complaint.close(&citizen, None).unwrap();

        assert_eq!(complaint.status(), ComplaintStatus::Closed);
        assert!(complaint.closed_at().is_some());
        assert_eq!(
            event,
            ComplaintEvent::Closed {
                complaint_id: complaint.id(),
                officer_id: Some(officer.id)
            }
        );
    }

    #[test]
    fn other_citizen_cannot_close() {
        let (mut complaint, _) = resolved();
        let stranger = Actor::new(Uuid::new_v4(), Role::Citizen);

        assert!(matches!(
            complaint.close(&stranger, None),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn cannot_close_unresolved_complaint() {
        let mut complaint = filed();
        let citizen = citizen_of(&complaint);

        assert!(complaint.close(&citizen, None).is_err());
    }

    #[test]
    fn grievance_allowed_once_on_resolved_complaint() {
        let (mut complaint, officer) = resolved();
        let citizen = citizen_of(&complaint);

        assert_eq!(complaint.ensure_grievance_allowed(&citizen).unwrap(), officer.id);

        complaint.attach_grievance(Uuid::new_v4());
        assert!(matches!(
            complaint.ensure_grievance_allowed(&citizen),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn grievance_not_allowed_before_resolution() {
        let complaint = filed();
        let citizen = citizen_of(&complaint);

        assert!(complaint.ensure_grievance_allowed(&citizen).is_err());
    }

    #[test]
    fn citizen_withdraws_only_pending_complaint() {
        let complaint = filed();
        assert!(complaint.ensure_deletable_by(&citizen_of(&complaint)).is_ok());

        let (resolved, _) = resolved();
        assert!(resolved.ensure_deletable_by(&citizen_of(&resolved)).is_err());
        assert!(resolved.ensure_deletable_by(&admin()).is_ok());
    }

    #[test]
    fn visibility_follows_ownership_and_assignment() {
        let (complaint, officer) = resolved();

        assert!(complaint.is_visible_to(&admin()));
        assert!(complaint.is_visible_to(&citizen_of(&complaint)));
        assert!(complaint.is_visible_to(&officer_actor(&officer)));
        assert!(!complaint.is_visible_to(&Actor::new(Uuid::new_v4(), Role::Officer)));
        assert!(!complaint.is_visible_to(&Actor::new(Uuid::new_v4(), Role::Citizen)));
    }
}
