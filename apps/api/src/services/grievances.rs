use std::sync::Arc;
use uuid::Uuid;

use super::complaints::require_role;
use crate::domain::complaint::Complaint;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::grievance::{Grievance, GrievanceEvent};
use crate::domain::notification::Notification;
use crate::domain::repositories::{ComplaintRepository, GrievanceRepository, OfficerRepository};
use crate::domain::user::{Actor, Role};

/// Grievance operations; every transition also writes the complaint it
/// reopens or settles
#[derive(Clone)]
pub struct GrievanceService {
    grievances: Arc<dyn GrievanceRepository>,
    complaints: Arc<dyn ComplaintRepository>,
    officers: Arc<dyn OfficerRepository>,
}

impl GrievanceService {
    pub fn new(
        grievances: Arc<dyn GrievanceRepository>,
        complaints: Arc<dyn ComplaintRepository>,
        officers: Arc<dyn OfficerRepository>,
    ) -> Self {
        Self {
            grievances,
            complaints,
            officers,
        }
    }

    /// Raises the one grievance a resolved complaint may carry
    pub async fn raise(
        &self,
        actor: &Actor,
        complaint_id: Uuid,
        reason: String,
    ) -> DomainResult<Grievance> {
        let mut complaint = self.load_complaint(complaint_id).await?;

        let (grievance, event) = Grievance::raise(&mut complaint, actor, reason)?;
        let notifications = Notification::for_grievance_event(&event);
        self.grievances.create(&grievance, &notifications).await?;

        tracing::info!(
            grievance_id = %grievance.id(),
            complaint_id = %complaint_id,
            originating_officer_id = %grievance.originating_officer_id(),
            "Grievance raised"
        );

        Ok(grievance)
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> DomainResult<Grievance> {
        let grievance = self.load(id).await?;
        if !grievance.is_visible_to(actor) {
            return Err(DomainError::forbidden("Not allowed to view this grievance"));
        }
        Ok(grievance)
    }

    pub async fn list_all(&self, actor: &Actor) -> DomainResult<Vec<Grievance>> {
        require_role(actor, Role::Admin, "Only administrators may list all grievances")?;
        Ok(self.grievances.find_all().await?)
    }

    pub async fn list_for_citizen(&self, actor: &Actor) -> DomainResult<Vec<Grievance>> {
        require_role(actor, Role::Citizen, "Only citizens raise grievances")?;
        Ok(self.grievances.find_by_citizen(actor.user_id).await?)
    }

    /// Grievances an officer originated or was handed; admins may ask for
    /// any officer, officers only for themselves
    pub async fn list_for_officer(
        &self,
        actor: &Actor,
        officer_id: Uuid,
    ) -> DomainResult<Vec<Grievance>> {
        if !(actor.is_admin() || actor.is_officer(officer_id)) {
            return Err(DomainError::forbidden(
                "Not allowed to list another officer's grievances",
            ));
        }
        Ok(self.grievances.find_by_officer(officer_id).await?)
    }

    pub async fn reassign(
        &self,
        actor: &Actor,
        id: Uuid,
        officer_id: Uuid,
    ) -> DomainResult<Grievance> {
        require_role(actor, Role::Admin, "Only administrators may reassign grievances")?;
        let mut grievance = self.load(id).await?;
        let mut complaint = self.load_complaint(grievance.complaint_id()).await?;
        let officer = self
            .officers
            .find_by_id(officer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Officer", officer_id))?;

        let event = grievance.reassign(&mut complaint, actor, &officer)?;
        self.commit(&grievance, &complaint, event).await?;
        Ok(grievance)
    }

    pub async fn resolve(
        &self,
        actor: &Actor,
        id: Uuid,
        note: Option<String>,
    ) -> DomainResult<Grievance> {
        let mut grievance = self.load(id).await?;
        let mut complaint = self.load_complaint(grievance.complaint_id()).await?;

        let event = grievance.resolve(&mut complaint, actor, note)?;
        self.commit(&grievance, &complaint, event).await?;
        Ok(grievance)
    }

    pub async fn attach_image(
        &self,
        actor: &Actor,
        id: Uuid,
        path: String,
    ) -> DomainResult<(Grievance, Option<String>)> {
        let mut grievance = self.load(id).await?;
        let replaced = grievance.set_image(actor, path)?;
        self.grievances.save(&grievance, None, &[]).await?;
        Ok((grievance, replaced))
    }

    /// Ensures the actor may attach an image before the upload is written
    pub async fn ensure_image_owner(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let grievance = self.load(id).await?;
        if !actor.is_citizen(grievance.citizen_id()) {
            return Err(DomainError::forbidden(
                "Only the citizen who raised the grievance may upload its image",
            ));
        }
        Ok(())
    }

    async fn load(&self, id: Uuid) -> DomainResult<Grievance> {
        self.grievances
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Grievance", id))
    }

    async fn load_complaint(&self, id: Uuid) -> DomainResult<Complaint> {
        self.complaints
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Complaint", id))
    }

    async fn commit(
        &self,
        grievance: &Grievance,
        complaint: &Complaint,
        event: GrievanceEvent,
    ) -> DomainResult<()> {
        let notifications = Notification::for_grievance_event(&event);
        self.grievances
            .save(grievance, Some(complaint), &notifications)
            .await?;

        tracing::info!(
            grievance_id = %grievance.id(),
            complaint_id = %complaint.id(),
            event = event.name(),
            status = %grievance.status(),
            complaint_status = %complaint.status(),
            "Grievance transition"
        );
        Ok(())
    }
}
