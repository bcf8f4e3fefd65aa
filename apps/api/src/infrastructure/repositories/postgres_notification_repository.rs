use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::db_error;
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::notification::{Notification, Recipient};
use crate::domain::repositories::NotificationRepository;

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    officer_id: Option<Uuid>,
    citizen_id: Option<Uuid>,
    complaint_id: Option<Uuid>,
    grievance_id: Option<Uuid>,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(r: NotificationRow) -> Self {
        Notification {
            id: r.id,
            officer_id: r.officer_id,
            citizen_id: r.citizen_id,
            complaint_id: r.complaint_id,
            grievance_id: r.grievance_id,
            message: r.message,
            is_read: r.is_read,
            created_at: r.created_at,
        }
    }
}

/// Writes notifications inside the caller's transaction
pub(crate) async fn insert_notifications(
    conn: &mut PgConnection,
    notifications: &[Notification],
) -> Result<(), sqlx::Error> {
    for n in notifications {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, officer_id, citizen_id, complaint_id, grievance_id,
                message, is_read, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(n.id)
        .bind(n.officer_id)
        .bind(n.citizen_id)
        .bind(n.complaint_id)
        .bind(n.grievance_id)
        .bind(&n.message)
        .bind(n.is_read)
        .bind(n.created_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// PostgreSQL implementation of NotificationRepository
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn find_for(&self, recipient: Recipient) -> RepositoryResult<Vec<Notification>> {
        let (column, id) = match recipient {
            Recipient::Officer(id) => ("officer_id", id),
            Recipient::Citizen(id) => ("citizen_id", id),
        };
        let sql = format!(
            r#"
            SELECT id, officer_id, citizen_id, complaint_id, grievance_id,
                   message, is_read, created_at
            FROM notifications
            WHERE {} = $1 AND NOT is_deleted
            ORDER BY created_at DESC
            "#,
            column
        );

        let rows = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list notifications", e))?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, officer_id, citizen_id, complaint_id, grievance_id,
                   message, is_read, created_at
            FROM notifications
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find notification", e))?;

        Ok(row.map(Notification::from))
    }

    async fn mark_read(&self, id: Uuid) -> RepositoryResult<()> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND NOT is_deleted")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to mark notification read", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Notification {}", id)));
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to delete notification", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Notification {}", id)));
        }
        Ok(())
    }
}
