use std::sync::Arc;
use uuid::Uuid;

use crate::domain::complaint::{Complaint, ComplaintEvent, NewComplaint};
use crate::domain::errors::{DomainError, DomainResult, Validator};
use crate::domain::notification::Notification;
use crate::domain::repositories::{
    ComplaintRepository, GrievanceRepository, OfficerRepository, TaxonomyRepository,
};
use crate::domain::user::{Actor, Role};

/// Citizen input for a new complaint
#[derive(Debug, Clone)]
pub struct FileComplaint {
    pub department_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
}

/// Complaint lifecycle operations
#[derive(Clone)]
pub struct ComplaintService {
    complaints: Arc<dyn ComplaintRepository>,
    grievances: Arc<dyn GrievanceRepository>,
    officers: Arc<dyn OfficerRepository>,
    taxonomy: Arc<dyn TaxonomyRepository>,
}

impl ComplaintService {
    pub fn new(
        complaints: Arc<dyn ComplaintRepository>,
        grievances: Arc<dyn GrievanceRepository>,
        officers: Arc<dyn OfficerRepository>,
        taxonomy: Arc<dyn TaxonomyRepository>,
    ) -> Self {
        Self {
            complaints,
            grievances,
            officers,
            taxonomy,
        }
    }

    /// Files a complaint for the calling citizen
    pub async fn file(&self, actor: &Actor, input: FileComplaint) -> DomainResult<Complaint> {
        require_role(actor, Role::Citizen, "Only citizens may file complaints")?;

        let department = self.taxonomy.find_department(input.department_id).await?;
        let category = self.taxonomy.find_category(input.category_id).await?;

        let mut v = Validator::new();
        v.check(department.is_some(), "department_id", "Unknown department");
        match &category {
            None => {
                v.check(false, "category_id", "Unknown category");
            }
            Some(category) => {
                v.check(
                    category.department_id == input.department_id,
                    "category_id",
                    "Category does not belong to the selected department",
                );
            }
        }
        v.finish()?;

        let (complaint, event) = Complaint::file(NewComplaint {
            citizen_id: actor.user_id,
            department_id: input.department_id,
            category_id: input.category_id,
            title: input.title,
            description: input.description,
            location: input.location,
        })?;

        let notifications = Notification::for_complaint_event(&event);
        self.complaints.create(&complaint, &notifications).await?;

        tracing::info!(
            complaint_id = %complaint.id(),
            citizen_id = %actor.user_id,
            department_id = %complaint.department_id(),
            "Complaint filed"
        );

        Ok(complaint)
    }

    /// Returns a complaint the actor is allowed to see
    pub async fn get(&self, actor: &Actor, id: Uuid) -> DomainResult<Complaint> {
        let complaint = self.load(id).await?;
        if !complaint.is_visible_to(actor) {
            return Err(DomainError::forbidden("Not allowed to view this complaint"));
        }
        Ok(complaint)
    }

    pub async fn list_all(&self, actor: &Actor) -> DomainResult<Vec<Complaint>> {
        require_role(actor, Role::Admin, "Only administrators may list all complaints")?;
        Ok(self.complaints.find_all().await?)
    }

    /// The calling citizen's own complaints
    pub async fn list_for_citizen(&self, actor: &Actor) -> DomainResult<Vec<Complaint>> {
        require_role(actor, Role::Citizen, "Only citizens have filed complaints")?;
        Ok(self.complaints.find_by_citizen(actor.user_id).await?)
    }

    /// Complaints currently assigned to the calling officer
    pub async fn list_for_officer(&self, actor: &Actor) -> DomainResult<Vec<Complaint>> {
        require_role(actor, Role::Officer, "Only officers have assigned complaints")?;
        Ok(self.complaints.find_by_officer(actor.user_id).await?)
    }

    pub async fn assign(
        &self,
        actor: &Actor,
        id: Uuid,
        officer_id: Uuid,
    ) -> DomainResult<Complaint> {
        require_role(actor, Role::Admin, "Only administrators may assign complaints")?;
        let mut complaint = self.load(id).await?;
        let officer = self
            .officers
            .find_by_id(officer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Officer", officer_id))?;

        let event = complaint.assign(actor, &officer)?;
        self.commit(&complaint, event).await?;
        Ok(complaint)
    }

    pub async fn start(&self, actor: &Actor, id: Uuid) -> DomainResult<Complaint> {
        let mut complaint = self.load(id).await?;
        let event = complaint.start(actor)?;
        self.commit(&complaint, event).await?;
        Ok(complaint)
    }

    pub async fn resolve(
        &self,
        actor: &Actor,
        id: Uuid,
        note: Option<String>,
    ) -> DomainResult<Complaint> {
        let mut complaint = self.load(id).await?;
        let event = complaint.resolve(actor, note)?;
        self.commit(&complaint, event).await?;
        Ok(complaint)
    }

    pub async fn close(&self, actor: &Actor, id: Uuid) -> DomainResult<Complaint> {
        let mut complaint = self.load(id).await?;
        let grievance = match complaint.grievance_id() {
            Some(grievance_id) => self.grievances.find_by_id(grievance_id).await?,
            None => None,
        };
        let event = complaint.close(actor, grievance.as_ref())?;
        self.commit(&complaint, event).await?;
        Ok(complaint)
    }

    /// Records an uploaded image path on the complaint, returning the
    /// path it replaced
    pub async fn attach_image(
        &self,
        actor: &Actor,
        id: Uuid,
        path: String,
    ) -> DomainResult<(Complaint, Option<String>)> {
        let mut complaint = self.load(id).await?;
        let replaced = complaint.set_image(actor, path)?;
        self.complaints.save(&complaint, &[]).await?;
        Ok((complaint, replaced))
    }

    /// Ensures the actor may attach an image before the upload is written
    pub async fn ensure_image_owner(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let complaint = self.load(id).await?;
        if !actor.is_citizen(complaint.citizen_id()) {
            return Err(DomainError::forbidden(
                "Only the citizen who filed the complaint may upload its image",
            ));
        }
        Ok(())
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let complaint = self.load(id).await?;
        complaint.ensure_deletable_by(actor)?;
        self.complaints.soft_delete(id).await?;

        tracing::info!(complaint_id = %id, actor = %actor.user_id, "Complaint deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> DomainResult<Complaint> {
        self.complaints
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Complaint", id))
    }

    async fn commit(&self, complaint: &Complaint, event: ComplaintEvent) -> DomainResult<()> {
        let notifications = Notification::for_complaint_event(&event);
        self.complaints.save(complaint, &notifications).await?;

        tracing::info!(
            complaint_id = %complaint.id(),
            event = event.name(),
            status = %complaint.status(),
            officer_id = ?complaint.assigned_officer_id(),
            "Complaint transition"
        );
        Ok(())
    }
}

pub(crate) fn require_role(actor: &Actor, role: Role, message: &str) -> DomainResult<()> {
    if actor.role == role {
        Ok(())
    } else {
        Err(DomainError::forbidden(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::complaint::ComplaintStatus;
    use crate::domain::officer::{ApprovalStatus, Officer};
    use crate::domain::repositories::{NotificationRepository, User};
    use crate::domain::taxonomy::{Category, Department};
    use crate::domain::user::Email;
    use crate::infrastructure::repositories::InMemoryStore;

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: ComplaintService,
        department: Department,
        category: Category,
        citizen: Actor,
        admin: Actor,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let department = Department::new("Sanitation".into(), None).unwrap();
        store.save_department(&department).await.unwrap();
        let category = Category::new(department.id, "Garbage".into(), None).unwrap();
        store.save_category(&category).await.unwrap();

        let service =
            ComplaintService::new(store.clone(), store.clone(), store.clone(), store.clone());
        Fixture {
            store,
            service,
            department,
            category,
            citizen: Actor::new(Uuid::new_v4(), Role::Citizen),
            admin: Actor::new(Uuid::new_v4(), Role::Admin),
        }
    }

    async fn add_officer(f: &Fixture, approval: ApprovalStatus) -> Actor {
        let id = Uuid::new_v4();
        let user = User {
            id,
            email: Email::new(format!("{}@city.gov", id)).unwrap(),
            password_hash: "hash".into(),
            full_name: "Officer".into(),
            phone: None,
            role: Role::Officer,
            is_active: true,
        };
        let officer = Officer {
            id,
            department_id: f.department.id,
            full_name: user.full_name.clone(),
            email: user.email.to_string(),
            designation: "Inspector".into(),
            proof_document: None,
            approval,
        };
        OfficerRepository::create(f.store.as_ref(), &user, &officer)
            .await
            .unwrap();
        Actor::new(id, Role::Officer)
    }

    fn input(f: &Fixture) -> FileComplaint {
        FileComplaint {
            department_id: f.department.id,
            category_id: f.category.id,
            title: "Missed pickup".into(),
            description: "Bins left full".into(),
            location: None,
        }
    }

    #[tokio::test]
    async fn full_lifecycle_produces_notifications() {
        let f = fixture().await;
        let officer = add_officer(&f, ApprovalStatus::Approved).await;

        let complaint = f.service.file(&f.citizen, input(&f)).await.unwrap();
        f.service
            .assign(&f.admin, complaint.id(), officer.user_id)
            .await
            .unwrap();
        f.service.start(&officer, complaint.id()).await.unwrap();
        f.service
            .resolve(&officer, complaint.id(), Some("Collected".into()))
            .await
            .unwrap();
        let closed = f.service.close(&f.citizen, complaint.id()).await.unwrap();

        assert_eq!(closed.status(), ComplaintStatus::Closed);

        let citizen_inbox = f
            .store
            .find_for(crate::domain::notification::Recipient::Citizen(f.citizen.user_id))
            .await
            .unwrap();
        // filed, assigned, started, resolved
        assert_eq!(citizen_inbox.len(), 4);

        let officer_inbox = f
            .store
            .find_for(crate::domain::notification::Recipient::Officer(officer.user_id))
            .await
            .unwrap();
        // assigned, closed
        assert_eq!(officer_inbox.len(), 2);
    }

    #[tokio::test]
    async fn filing_checks_taxonomy() {
        let f = fixture().await;
        let mut bad = input(&f);
        bad.category_id = Uuid::new_v4();
        bad.department_id = Uuid::new_v4();

        match f.service.file(&f.citizen, bad).await {
            Err(DomainError::Validation(fields)) => {
                let names: Vec<_> = fields.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(names, vec!["department_id", "category_id"]);
            }
            other => panic!("Expected validation error, got {:?}", other.map(|c| c.id())),
        }
    }

    #[tokio::test]
    async fn filing_rejects_category_from_other_department() {
        let f = fixture().await;
        let other = Department::new("Roads".into(), None).unwrap();
        f.store.save_department(&other).await.unwrap();
        let mut bad = input(&f);
        bad.department_id = other.id;

        assert!(matches!(
            f.service.file(&f.citizen, bad).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn only_citizens_file() {
        let f = fixture().await;
        assert!(matches!(
            f.service.file(&f.admin, input(&f)).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn unapproved_officer_cannot_be_assigned() {
        let f = fixture().await;
        let officer = add_officer(&f, ApprovalStatus::Pending).await;
        let complaint = f.service.file(&f.citizen, input(&f)).await.unwrap();

        let result = f
            .service
            .assign(&f.admin, complaint.id(), officer.user_id)
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn resolve_without_start_is_rejected_and_not_persisted() {
        let f = fixture().await;
        let officer = add_officer(&f, ApprovalStatus::Approved).await;
        let complaint = f.service.file(&f.citizen, input(&f)).await.unwrap();
        f.service
            .assign(&f.admin, complaint.id(), officer.user_id)
            .await
            .unwrap();

        let result = f.service.resolve(&officer, complaint.id(), None).await;
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));

        let stored = f.service.get(&f.citizen, complaint.id()).await.unwrap();
        assert_eq!(stored.status(), ComplaintStatus::Pending);
    }

    #[tokio::test]
    async fn officer_lists_only_assigned_complaints() {
        let f = fixture().await;
        let officer = add_officer(&f, ApprovalStatus::Approved).await;
        let assigned = f.service.file(&f.citizen, input(&f)).await.unwrap();
        f.service.file(&f.citizen, input(&f)).await.unwrap();
        f.service
            .assign(&f.admin, assigned.id(), officer.user_id)
            .await
            .unwrap();

        let listed = f.service.list_for_officer(&officer).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), assigned.id());
        assert_eq!(f.service.list_for_citizen(&f.citizen).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn deleted_complaint_disappears() {
        let f = fixture().await;
        let complaint = f.service.file(&f.citizen, input(&f)).await.unwrap();

        f.service.delete(&f.citizen, complaint.id()).await.unwrap();

        assert!(matches!(
            f.service.get(&f.admin, complaint.id()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(f.service.list_all(&f.admin).await.unwrap().is_empty());
    }
}
