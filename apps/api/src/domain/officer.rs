// Officer profile
// An officer is a user with role Officer attached to one department

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::{DomainError, DomainResult};

/// Administrative approval state of an officer account
///
/// ```text
/// Pending -> Approved
///        \-> Rejected -> Approved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "officer_approval", rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Officer {
    /// Same id as the officer's user account
    pub id: Uuid,
    pub department_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub designation: String,
    pub proof_document: Option<String>,
    pub approval: ApprovalStatus,
}

impl Officer {
    pub fn approve(&mut self) -> DomainResult<()> {
        if self.approval == ApprovalStatus::Approved {
            return Err(DomainError::invalid_transition(
                self.approval,
                ApprovalStatus::Approved,
            ));
        }
        self.approval = ApprovalStatus::Approved;
        Ok(())
    }

    pub fn reject(&mut self) -> DomainResult<()> {
        if self.approval != ApprovalStatus::Pending {
            return Err(DomainError::invalid_transition(
                self.approval,
                ApprovalStatus::Rejected,
            ));
        }
        self.approval = ApprovalStatus::Rejected;
        Ok(())
    }

    /// Checks that this officer may take work in `department_id`
    pub fn ensure_assignable_to(&self, department_id: Uuid) -> DomainResult<()> {
        if self.approval != ApprovalStatus::Approved {
            return Err(DomainError::conflict(format!(
                "Officer {} is not approved",
                self.id
            )));
        }
        if self.department_id != department_id {
            return Err(DomainError::invalid_field(
                "officer_id",
                "Officer does not belong to the complaint's department",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn approved_officer(department_id: Uuid) -> Officer {
    Officer {
        id: Uuid::new_v4(),
        department_id,
        full_name: "Test Officer".to_string(),
        email: "officer@city.gov".to_string(),
        designation: "Inspector".to_string(),
        proof_document: None,
        approval: ApprovalStatus::Approved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_officer() -> Officer {
        Officer {
            approval: ApprovalStatus::Pending,
            ..approved_officer(Uuid::new_v4())
        }
    }

    #[test]
    fn pending_officer_can_be_approved() {
        let mut officer = pending_officer();
        officer.approve().unwrap();
        assert_eq!(officer.approval, ApprovalStatus::Approved);
    }

    #[test]
    fn rejected_officer_can_be_approved_later() {
        let mut officer = pending_officer();
        officer.reject().unwrap();
        officer.approve().unwrap();
        assert_eq!(officer.approval, ApprovalStatus::Approved);
    }

    #[test]
    fn approved_officer_cannot_be_rejected() {
        let mut officer = approved_officer(Uuid::new_v4());
        assert!(officer.reject().is_err());
        assert!(officer.approve().is_err());
    }

    #[test]
    fn unapproved_officer_is_not_assignable() {
        let officer = pending_officer();
        let result = officer.ensure_assignable_to(officer.department_id);
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn officer_from_other_department_is_not_assignable() {
        let officer = approved_officer(Uuid::new_v4());
        let result = officer.ensure_assignable_to(Uuid::new_v4());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
