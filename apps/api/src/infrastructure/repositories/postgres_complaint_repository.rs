use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::db_error;
use super::postgres_notification_repository::insert_notifications;
use crate::domain::complaint::{Complaint, ComplaintAssignment, ComplaintRecord, ComplaintStatus};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::notification::Notification;
use crate::domain::repositories::ComplaintRepository;

#[derive(sqlx::FromRow)]
struct ComplaintRow {
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
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    assigned_officer_id: Option<Uuid>,
    assigned_by: Option<Uuid>,
    assigned_at: Option<DateTime<Utc>>,
    grievance_id: Option<Uuid>,
}

impl From<ComplaintRow> for Complaint {
    fn from(r: ComplaintRow) -> Self {
        let assignment = match (r.assigned_officer_id, r.assigned_by, r.assigned_at) {
            (Some(officer_id), Some(assigned_by), Some(assigned_at)) => Some(ComplaintAssignment {
                officer_id,
                complaint_id: r.id,
                assigned_by,
                assigned_at,
            }),
            _ => None,
        };

        Complaint::from_persistence(ComplaintRecord {
            id: r.id,
            citizen_id: r.citizen_id,
            department_id: r.department_id,
            category_id: r.category_id,
            title: r.title,
            description: r.description,
            location: r.location,
            image_path: r.image_path,
            status: r.status,
            resolution_note: r.resolution_note,
            assignment,
            grievance_id: r.grievance_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
            resolved_at: r.resolved_at,
            closed_at: r.closed_at,
        })
    }
}

/// Live complaints with their active assignment and live grievance
const SELECT_COMPLAINTS: &str = r#"
    SELECT
        c.id, c.citizen_id, c.department_id, c.category_id,
        c.title, c.description, c.location, c.image_path,
        c.status, c.resolution_note,
        c.created_at, c.updated_at, c.resolved_at, c.closed_at,
        a.officer_id AS assigned_officer_id, a.assigned_by, a.assigned_at,
        (SELECT g.id FROM grievances g
         WHERE g.complaint_id = c.id AND NOT g.is_deleted) AS grievance_id
    FROM complaints c
    LEFT JOIN complaint_assignments a
        ON a.complaint_id = c.id AND a.is_active AND NOT a.is_deleted
    WHERE NOT c.is_deleted
"#;

/// Updates a complaint row and brings its assignment rows in line with
/// the aggregate; runs inside the caller's transaction
pub(crate) async fn write_complaint(
    conn: &mut PgConnection,
    complaint: &Complaint,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE complaints SET
            status = $2,
            resolution_note = $3,
            image_path = $4,
            updated_at = $5,
            resolved_at = $6,
            closed_at = $7
        WHERE id = $1 AND NOT is_deleted
        "#,
    )
    .bind(complaint.id())
    .bind(complaint.status())
    .bind(complaint.resolution_note())
    .bind(complaint.image_path())
    .bind(complaint.updated_at())
    .bind(complaint.resolved_at())
    .bind(complaint.closed_at())
    .execute(&mut *conn)
    .await?;

    let active_officer = complaint.assigned_officer_id();

    // Deactivate first so the one-active-assignment index holds
    sqlx::query(
        r#"
        UPDATE complaint_assignments
        SET is_active = FALSE
        WHERE complaint_id = $1 AND is_active
          AND ($2::uuid IS NULL OR officer_id <> $2)
        "#,
    )
    .bind(complaint.id())
    .bind(active_officer)
    .execute(&mut *conn)
    .await?;

    if let Some(assignment) = complaint.assignment() {
        sqlx::query(
            r#"
            INSERT INTO complaint_assignments (
                officer_id, complaint_id, assigned_by, assigned_at, is_active, is_deleted
            )
            VALUES ($1, $2, $3, $4, TRUE, FALSE)
            ON CONFLICT (officer_id, complaint_id) DO UPDATE SET
                assigned_by = EXCLUDED.assigned_by,
                assigned_at = EXCLUDED.assigned_at,
                is_active = TRUE,
                is_deleted = FALSE
            "#,
        )
        .bind(assignment.officer_id)
        .bind(assignment.complaint_id)
        .bind(assignment.assigned_by)
        .bind(assignment.assigned_at)
        .execute(&mut *conn)
        .await?;
    }

    Ok(result.rows_affected())
}

/// PostgreSQL implementation of ComplaintRepository
pub struct PostgresComplaintRepository {
    pool: PgPool,
}

impl PostgresComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_many(
        &self,
        filter: &str,
        id: Option<Uuid>,
        context: &str,
    ) -> RepositoryResult<Vec<Complaint>> {
        let sql = format!("{} {} ORDER BY c.created_at DESC", SELECT_COMPLAINTS, filter);
        let mut query = sqlx::query_as::<_, ComplaintRow>(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(context, e))?;

        Ok(rows.into_iter().map(Complaint::from).collect())
    }
}

#[async_trait]
impl ComplaintRepository for PostgresComplaintRepository {
    async fn create(
        &self,
        complaint: &Complaint,
        notifications: &[Notification],
    ) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO complaints (
                id, citizen_id, department_id, category_id, title, description,
                location, image_path, status, resolution_note,
                created_at, updated_at, resolved_at, closed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(complaint.id())
        .bind(complaint.citizen_id())
        .bind(complaint.department_id())
        .bind(complaint.category_id())
        .bind(complaint.title())
        .bind(complaint.description())
        .bind(complaint.location())
        .bind(complaint.image_path())
        .bind(complaint.status())
        .bind(complaint.resolution_note())
        .bind(complaint.created_at())
        .bind(complaint.updated_at())
        .bind(complaint.resolved_at())
        .bind(complaint.closed_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to create complaint", e))?;

        insert_notifications(&mut tx, notifications)
            .await
            .map_err(|e| db_error("Failed to create notifications", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit complaint", e))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Complaint>> {
        let sql = format!("{} AND c.id = $1", SELECT_COMPLAINTS);
        let row = sqlx::query_as::<_, ComplaintRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find complaint", e))?;

        Ok(row.map(Complaint::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Complaint>> {
        self.fetch_many("", None, "Failed to list complaints").await
    }

    async fn find_by_citizen(&self, citizen_id: Uuid) -> RepositoryResult<Vec<Complaint>> {
        self.fetch_many(
            "AND c.citizen_id = $1",
            Some(citizen_id),
            "Failed to list complaints by citizen",
        )
        .await
    }

    async fn find_by_officer(&self, officer_id: Uuid) -> RepositoryResult<Vec<Complaint>> {
        self.fetch_many(
            "AND a.officer_id = $1",
            Some(officer_id),
            "Failed to list complaints by officer",
        )
        .await
    }

    async fn save(
        &self,
        complaint: &Complaint,
        notifications: &[Notification],
    ) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let updated = write_complaint(&mut tx, complaint)
            .await
            .map_err(|e| db_error("Failed to save complaint", e))?;
        if updated == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Complaint {}",
                complaint.id()
            )));
        }

        insert_notifications(&mut tx, notifications)
            .await
            .map_err(|e| db_error("Failed to create notifications", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit complaint", e))
    }

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let result = sqlx::query(
            "UPDATE complaints SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to delete complaint", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Complaint {}", id)));
        }

        sqlx::query("UPDATE complaint_assignments SET is_deleted = TRUE WHERE complaint_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete complaint assignments", e))?;

        sqlx::query("UPDATE grievances SET is_deleted = TRUE, updated_at = NOW() WHERE complaint_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete complaint grievance", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit complaint deletion", e))
    }
}
