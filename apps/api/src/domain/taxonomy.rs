// Department and category taxonomy
// Complaints are filed against a department and one of its categories

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::{DomainResult, Validator};

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

/// A civic department that owns categories and officers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Department {
    /// Creates a department after validating its fields
    pub fn new(name: String, description: Option<String>) -> DomainResult<Self> {
        validate(&name, description.as_deref())?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description,
            created_at: Utc::now(),
        })
    }

    pub fn rename(&mut self, name: String, description: Option<String>) -> DomainResult<()> {
        validate(&name, description.as_deref())?;
        self.name = name.trim().to_string();
        self.description = description;
        Ok(())
    }
}

/// A complaint category within a department
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub department_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(
        department_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> DomainResult<Self> {
        validate(&name, description.as_deref())?;
        Ok(Self {
            id: Uuid::new_v4(),
            department_id,
            name: name.trim().to_string(),
            description,
            created_at: Utc::now(),
        })
    }

    pub fn update(
        &mut self,
        department_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> DomainResult<()> {
        validate(&name, description.as_deref())?;
        self.department_id = department_id;
        self.name = name.trim().to_string();
        self.description = description;
        Ok(())
    }
}

fn validate(name: &str, description: Option<&str>) -> DomainResult<()> {
    let mut v = Validator::new();
    v.text("name", name, NAME_MAX);
    if let Some(description) = description {
        v.check(
            description.chars().count() <= DESCRIPTION_MAX,
            "description",
            "description must be at most 500 characters",
        );
    }
    v.finish()
}
