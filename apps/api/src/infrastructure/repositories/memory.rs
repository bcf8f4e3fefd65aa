//! In-memory repository adapter
//!
//! Implements every repository port over mutex-guarded maps with the same
//! observable rules as the PostgreSQL adapters: soft-deleted rows are
//! invisible, live uniqueness constraints surface as conflicts, and the
//! active assignment and grievance of a complaint are derived from their
//! own tables. Used by the HTTP test-suite and for local runs without a
//! database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::complaint::{Complaint, ComplaintAssignment, ComplaintRecord};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::grievance::Grievance;
use crate::domain::notification::{Notification, Recipient};
use crate::domain::officer::{ApprovalStatus, Officer};
use crate::domain::repositories::{
    ComplaintRepository, GrievanceRepository, NotificationRepository, OfficerRepository,
    TaxonomyRepository, User, UserRepository,
};
use crate::domain::taxonomy::{Category, Department};
use crate::domain::user::Email;

struct Row<T> {
    value: T,
    deleted: bool,
}

impl<T> Row<T> {
    fn live(value: T) -> Self {
        Self {
            value,
            deleted: false,
        }
    }
}

struct AssignmentRow {
    assignment: ComplaintAssignment,
    active: bool,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, Row<User>>,
    officers: HashMap<Uuid, Row<Officer>>,
    departments: HashMap<Uuid, Row<Department>>,
    categories: HashMap<Uuid, Row<Category>>,
    complaints: HashMap<Uuid, Row<Complaint>>,
    assignments: HashMap<(Uuid, Uuid), Row<AssignmentRow>>,
    grievances: HashMap<Uuid, Row<Grievance>>,
    notifications: HashMap<Uuid, Row<Notification>>,
}

fn live<T>(map: &HashMap<Uuid, Row<T>>) -> impl Iterator<Item = &T> {
    map.values().filter(|r| !r.deleted).map(|r| &r.value)
}

impl Tables {
    fn active_assignment(&self, complaint_id: Uuid) -> Option<ComplaintAssignment> {
        self.assignments
            .values()
            .filter(|r| !r.deleted && r.value.active)
            .map(|r| r.value.assignment)
            .find(|a| a.complaint_id == complaint_id)
    }

    fn live_grievance_id(&self, complaint_id: Uuid) -> Option<Uuid> {
        live(&self.grievances)
            .find(|g| g.complaint_id() == complaint_id)
            .map(|g| g.id())
    }

    fn complaint_is_live(&self, complaint_id: Uuid) -> bool {
        self.complaints
            .get(&complaint_id)
            .is_some_and(|r| !r.deleted)
    }

    /// Rebuilds a complaint the way the SQL adapter's join does
    fn load_complaint(&self, stored: &Complaint) -> Complaint {
        Complaint::from_persistence(ComplaintRecord {
            id: stored.id(),
            citizen_id: stored.citizen_id(),
            department_id: stored.department_id(),
            category_id: stored.category_id(),
            title: stored.title().to_string(),
            description: stored.description().to_string(),
            location: stored.location().map(str::to_string),
            image_path: stored.image_path().map(str::to_string),
            status: stored.status(),
            resolution_note: stored.resolution_note().map(str::to_string),
            assignment: self.active_assignment(stored.id()),
            grievance_id: self.live_grievance_id(stored.id()),
            created_at: stored.created_at(),
            updated_at: stored.updated_at(),
            resolved_at: stored.resolved_at(),
            closed_at: stored.closed_at(),
        })
    }

    fn complaints_where(&self, keep: impl Fn(&Complaint) -> bool) -> Vec<Complaint> {
        let mut out: Vec<Complaint> = live(&self.complaints)
            .map(|c| self.load_complaint(c))
            .filter(|c| keep(c))
            .collect();
        out.sort_by_key(|c| std::cmp::Reverse(c.created_at()));
        out
    }

    fn grievances_where(&self, keep: impl Fn(&Grievance) -> bool) -> Vec<Grievance> {
        let mut out: Vec<Grievance> = live(&self.grievances)
            .filter(|g| self.complaint_is_live(g.complaint_id()) && keep(g))
            .cloned()
            .collect();
        out.sort_by_key(|g| std::cmp::Reverse(g.created_at()));
        out
    }

    fn write_complaint(&mut self, complaint: &Complaint) -> RepositoryResult<()> {
        match self.complaints.get_mut(&complaint.id()) {
            Some(row) if !row.deleted => row.value = complaint.clone(),
            _ => {
                return Err(RepositoryError::NotFound(format!(
                    "Complaint {}",
                    complaint.id()
                )))
            }
        }

        let active_officer = complaint.assigned_officer_id();
        for row in self.assignments.values_mut() {
            let a = &row.value.assignment;
            if a.complaint_id == complaint.id() && Some(a.officer_id) != active_officer {
                row.value.active = false;
            }
        }
        if let Some(assignment) = complaint.assignment() {
            self.assignments.insert(
                (assignment.officer_id, assignment.complaint_id),
                Row::live(AssignmentRow {
                    assignment: *assignment,
                    active: true,
                }),
            );
        }
        Ok(())
    }

    fn insert_notifications(&mut self, notifications: &[Notification]) {
        for n in notifications {
            self.notifications.insert(n.id, Row::live(n.clone()));
        }
    }
}

/// Shared in-memory store implementing every repository trait
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> RepositoryResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Backend("In-memory store lock poisoned".to_string()))
    }
}

fn soft_delete<T>(map: &mut HashMap<Uuid, Row<T>>, id: Uuid, entity: &str) -> RepositoryResult<()> {
    match map.get_mut(&id) {
        Some(row) if !row.deleted => {
            row.deleted = true;
            Ok(())
        }
        _ => Err(RepositoryError::NotFound(format!("{} {}", entity, id))),
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> RepositoryResult<Uuid> {
        let mut t = self.tables()?;
        if live(&t.users).any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(
                "Failed to create user: duplicate record".to_string(),
            ));
        }
        let id = user.id;
        t.users.insert(id, Row::live(user));
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let t = self.tables()?;
        let found = live(&t.users).find(|u| u.id == id).cloned();
        Ok(found)
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let t = self.tables()?;
        let found = live(&t.users).find(|u| &u.email == email).cloned();
        Ok(found)
    }

    async fn update_last_login(&self, _user_id: Uuid) -> RepositoryResult<()> {
        Ok(())
    }
}

#[async_trait]
impl OfficerRepository for InMemoryStore {
    async fn create(&self, user: &User, officer: &Officer) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        if live(&t.users).any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(
                "Failed to create officer account: duplicate record".to_string(),
            ));
        }
        t.users.insert(user.id, Row::live(user.clone()));
        t.officers.insert(officer.id, Row::live(officer.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Officer>> {
        let t = self.tables()?;
        let found = live(&t.officers).find(|o| o.id == id).cloned();
        Ok(found)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Officer>> {
        let t = self.tables()?;
        let mut out: Vec<Officer> = live(&t.officers).cloned().collect();
        out.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(out)
    }

    async fn find_by_approval(&self, approval: ApprovalStatus) -> RepositoryResult<Vec<Officer>> {
        let mut out = OfficerRepository::find_all(self).await?;
        out.retain(|o| o.approval == approval);
        Ok(out)
    }

    async fn find_by_department(&self, department_id: Uuid) -> RepositoryResult<Vec<Officer>> {
        let mut out = OfficerRepository::find_all(self).await?;
        out.retain(|o| o.department_id == department_id);
        Ok(out)
    }

    async fn save(&self, officer: &Officer) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        match t.officers.get_mut(&officer.id) {
            Some(row) if !row.deleted => {
                row.value = officer.clone();
                Ok(())
            }
            _ => Err(RepositoryError::NotFound(format!("Officer {}", officer.id))),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        soft_delete(&mut t.officers, id, "Officer")?;
        if let Some(row) = t.users.get_mut(&id) {
            row.deleted = true;
        }
        Ok(())
    }
}

#[async_trait]
impl TaxonomyRepository for InMemoryStore {
    async fn save_department(&self, department: &Department) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        let name = department.name.to_lowercase();
        if live(&t.departments).any(|d| d.id != department.id && d.name.to_lowercase() == name) {
            return Err(RepositoryError::Conflict(
                "Failed to save department: duplicate record".to_string(),
            ));
        }
        t.departments
            .insert(department.id, Row::live(department.clone()));
        Ok(())
    }

    async fn find_department(&self, id: Uuid) -> RepositoryResult<Option<Department>> {
        let t = self.tables()?;
        let found = live(&t.departments).find(|d| d.id == id).cloned();
        Ok(found)
    }

    async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        let t = self.tables()?;
        let mut out: Vec<Department> = live(&t.departments).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn delete_department(&self, id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        soft_delete(&mut t.departments, id, "Department")?;
        for row in t.categories.values_mut() {
            if row.value.department_id == id {
                row.deleted = true;
            }
        }
        Ok(())
    }

    async fn save_category(&self, category: &Category) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        if !t.departments.contains_key(&category.department_id) {
            return Err(RepositoryError::Conflict(
                "Failed to save category: referenced record missing".to_string(),
            ));
        }
        t.categories.insert(category.id, Row::live(category.clone()));
        Ok(())
    }

    async fn find_category(&self, id: Uuid) -> RepositoryResult<Option<Category>> {
        let t = self.tables()?;
        let found = live(&t.categories).find(|c| c.id == id).cloned();
        Ok(found)
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let t = self.tables()?;
        let mut out: Vec<Category> = live(&t.categories).cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn list_categories_by_department(
        &self,
        department_id: Uuid,
    ) -> RepositoryResult<Vec<Category>> {
        let mut out = self.list_categories().await?;
        out.retain(|c| c.department_id == department_id);
        Ok(out)
    }

    async fn delete_category(&self, id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        soft_delete(&mut t.categories, id, "Category")
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryStore {
    async fn create(
        &self,
        complaint: &Complaint,
        notifications: &[Notification],
    ) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        if t.complaints.contains_key(&complaint.id()) {
            return Err(RepositoryError::Conflict(
                "Failed to create complaint: duplicate record".to_string(),
            ));
        }
        t.complaints
            .insert(complaint.id(), Row::live(complaint.clone()));
        t.insert_notifications(notifications);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Complaint>> {
        let t = self.tables()?;
        let found = live(&t.complaints)
            .find(|c| c.id() == id)
            .map(|c| t.load_complaint(c));
        Ok(found)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Complaint>> {
        let t = self.tables()?;
        Ok(t.complaints_where(|_| true))
    }

    async fn find_by_citizen(&self, citizen_id: Uuid) -> RepositoryResult<Vec<Complaint>> {
        let t = self.tables()?;
        Ok(t.complaints_where(|c| c.citizen_id() == citizen_id))
    }

    async fn find_by_officer(&self, officer_id: Uuid) -> RepositoryResult<Vec<Complaint>> {
        let t = self.tables()?;
        Ok(t.complaints_where(|c| c.assigned_officer_id() == Some(officer_id)))
    }

    async fn save(
        &self,
        complaint: &Complaint,
        notifications: &[Notification],
    ) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        t.write_complaint(complaint)?;
        t.insert_notifications(notifications);
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        soft_delete(&mut t.complaints, id, "Complaint")?;
        for row in t.assignments.values_mut() {
            if row.value.assignment.complaint_id == id {
                row.deleted = true;
            }
        }
        for row in t.grievances.values_mut() {
            if row.value.complaint_id() == id {
                row.deleted = true;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GrievanceRepository for InMemoryStore {
    async fn create(
        &self,
        grievance: &Grievance,
        notifications: &[Notification],
    ) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        if t.live_grievance_id(grievance.complaint_id()).is_some() {
            return Err(RepositoryError::Conflict(
                "Failed to create grievance: duplicate record".to_string(),
            ));
        }
        t.grievances
            .insert(grievance.id(), Row::live(grievance.clone()));
        t.insert_notifications(notifications);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Grievance>> {
        let t = self.tables()?;
        Ok(t.grievances_where(|g| g.id() == id).into_iter().next())
    }

    async fn find_by_complaint(&self, complaint_id: Uuid) -> RepositoryResult<Option<Grievance>> {
        let t = self.tables()?;
        Ok(t
            .grievances_where(|g| g.complaint_id() == complaint_id)
            .into_iter()
            .next())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Grievance>> {
        let t = self.tables()?;
        Ok(t.grievances_where(|_| true))
    }

    async fn find_by_citizen(&self, citizen_id: Uuid) -> RepositoryResult<Vec<Grievance>> {
        let t = self.tables()?;
        Ok(t.grievances_where(|g| g.citizen_id() == citizen_id))
    }

    async fn find_by_officer(&self, officer_id: Uuid) -> RepositoryResult<Vec<Grievance>> {
        let t = self.tables()?;
        Ok(t.grievances_where(|g| {
            g.originating_officer_id() == officer_id
                || g.reassigned_officer_id() == Some(officer_id)
        }))
    }

    async fn save(
        &self,
        grievance: &Grievance,
        complaint: Option<&Complaint>,
        notifications: &[Notification],
    ) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        match t.grievances.get(&grievance.id()) {
            Some(row) if !row.deleted => {}
            _ => {
                return Err(RepositoryError::NotFound(format!(
                    "Grievance {}",
                    grievance.id()
                )))
            }
        }
        if let Some(complaint) = complaint {
            t.write_complaint(complaint)?;
        }
        t.grievances
            .insert(grievance.id(), Row::live(grievance.clone()));
        t.insert_notifications(notifications);
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn find_for(&self, recipient: Recipient) -> RepositoryResult<Vec<Notification>> {
        let t = self.tables()?;
        let mut out: Vec<Notification> = live(&t.notifications)
            .filter(|n| match recipient {
                Recipient::Officer(id) => n.officer_id == Some(id),
                Recipient::Citizen(id) => n.citizen_id == Some(id),
            })
            .cloned()
            .collect();
        out.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        Ok(out)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Notification>> {
        let t = self.tables()?;
        let found = live(&t.notifications).find(|n| n.id == id).cloned();
        Ok(found)
    }

    async fn mark_read(&self, id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        match t.notifications.get_mut(&id) {
            Some(row) if !row.deleted => {
                row.value.is_read = true;
                Ok(())
            }
            _ => Err(RepositoryError::NotFound(format!("Notification {}", id))),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables()?;
        soft_delete(&mut t.notifications, id, "Notification")
    }
}
