use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use super::postgres_complaint_repository::write_complaint;
use super::postgres_notification_repository::insert_notifications;
use crate::domain::complaint::Complaint;
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::grievance::{Grievance, GrievanceRecord, GrievanceStatus};
use crate::domain::notification::Notification;
use crate::domain::repositories::GrievanceRepository;

#[derive(sqlx::FromRow)]
struct GrievanceRow {
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

impl From<GrievanceRow> for Grievance {
    fn from(r: GrievanceRow) -> Self {
        Grievance::from_persistence(GrievanceRecord {
            id: r.id,
            complaint_id: r.complaint_id,
            citizen_id: r.citizen_id,
            originating_officer_id: r.originating_officer_id,
            reassigned_officer_id: r.reassigned_officer_id,
            reason: r.reason,
            image_path: r.image_path,
            status: r.status,
            resolution_note: r.resolution_note,
            created_at: r.created_at,
            updated_at: r.updated_at,
            resolved_at: r.resolved_at,
        })
    }
}

const SELECT_GRIEVANCES: &str = r#"
    SELECT
        g.id, g.complaint_id, g.citizen_id,
        g.originating_officer_id, g.reassigned_officer_id,
        g.reason, g.image_path, g.status, g.resolution_note,
        g.created_at, g.updated_at, g.resolved_at
    FROM grievances g
    JOIN complaints c ON c.id = g.complaint_id AND NOT c.is_deleted
    WHERE NOT g.is_deleted
"#;

/// PostgreSQL implementation of GrievanceRepository
pub struct PostgresGrievanceRepository {
    pool: PgPool,
}

impl PostgresGrievanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_many(
        &self,
        filter: &str,
        id: Option<Uuid>,
        context: &str,
    ) -> RepositoryResult<Vec<Grievance>> {
        let sql = format!("{} {} ORDER BY g.created_at DESC", SELECT_GRIEVANCES, filter);
        let mut query = sqlx::query_as::<_, GrievanceRow>(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(context, e))?;

        Ok(rows.into_iter().map(Grievance::from).collect())
    }

    async fn fetch_one(
        &self,
        filter: &str,
        id: Uuid,
        context: &str,
    ) -> RepositoryResult<Option<Grievance>> {
        let sql = format!("{} {}", SELECT_GRIEVANCES, filter);
        let row = sqlx::query_as::<_, GrievanceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(context, e))?;

        Ok(row.map(Grievance::from))
    }
}

#[async_trait]
impl GrievanceRepository for PostgresGrievanceRepository {
    async fn create(
        &self,
        grievance: &Grievance,
        notifications: &[Notification],
    ) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO grievances (
                id, complaint_id, citizen_id, originating_officer_id,
                reassigned_officer_id, reason, image_path, status,
                resolution_note, created_at, updated_at, resolved_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(grievance.id())
        .bind(grievance.complaint_id())
        .bind(grievance.citizen_id())
        .bind(grievance.originating_officer_id())
        .bind(grievance.reassigned_officer_id())
        .bind(grievance.reason())
        .bind(grievance.image_path())
        .bind(grievance.status())
        .bind(grievance.resolution_note())
        .bind(grievance.created_at())
        .bind(grievance.updated_at())
        .bind(grievance.resolved_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to create grievance", e))?;

        insert_notifications(&mut tx, notifications)
            .await
            .map_err(|e| db_error("Failed to create notifications", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit grievance", e))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Grievance>> {
        self.fetch_one("AND g.id = $1", id, "Failed to find grievance")
            .await
    }

    async fn find_by_complaint(&self, complaint_id: Uuid) -> RepositoryResult<Option<Grievance>> {
        self.fetch_one(
            "AND g.complaint_id = $1",
            complaint_id,
            "Failed to find grievance by complaint",
        )
        .await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Grievance>> {
        self.fetch_many("", None, "Failed to list grievances").await
    }

    async fn find_by_citizen(&self, citizen_id: Uuid) -> RepositoryResult<Vec<Grievance>> {
        self.fetch_many(
            "AND g.citizen_id = $1",
            Some(citizen_id),
            "Failed to list grievances by citizen",
        )
        .await
    }

    async fn find_by_officer(&self, officer_id: Uuid) -> RepositoryResult<Vec<Grievance>> {
        self.fetch_many(
            "AND (g.originating_officer_id = $1 OR g.reassigned_officer_id = $1)",
            Some(officer_id),
            "Failed to list grievances by officer",
        )
        .await
    }

    async fn save(
        &self,
        grievance: &Grievance,
        complaint: Option<&Complaint>,
        notifications: &[Notification],
    ) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let result = sqlx::query(
            r#"
            UPDATE grievances SET
                reassigned_officer_id = $2,
                image_path = $3,
                status = $4,
                resolution_note = $5,
                updated_at = $6,
                resolved_at = $7
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(grievance.id())
        .bind(grievance.reassigned_officer_id())
        .bind(grievance.image_path())
        .bind(grievance.status())
        .bind(grievance.resolution_note())
        .bind(grievance.updated_at())
        .bind(grievance.resolved_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to save grievance", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Grievance {}",
                grievance.id()
            )));
        }

        if let Some(complaint) = complaint {
            let updated = write_complaint(&mut tx, complaint)
                .await
                .map_err(|e| db_error("Failed to save grievance complaint", e))?;
            if updated == 0 {
                return Err(RepositoryError::NotFound(format!(
                    "Complaint {}",
                    complaint.id()
                )));
            }
        }

        insert_notifications(&mut tx, notifications)
            .await
            .map_err(|e| db_error("Failed to create notifications", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit grievance", e))
    }
}
