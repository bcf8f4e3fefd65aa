use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use super::postgres_user_repository::insert_user;
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::officer::{ApprovalStatus, Officer};
use crate::domain::repositories::{OfficerRepository, User};

#[derive(sqlx::FromRow)]
struct OfficerRow {
    id: Uuid,
    department_id: Uuid,
    full_name: String,
    email: String,
    designation: String,
    proof_document: Option<String>,
    approval: ApprovalStatus,
}

impl From<OfficerRow> for Officer {
    fn from(r: OfficerRow) -> Self {
        Officer {
            id: r.id,
            department_id: r.department_id,
            full_name: r.full_name,
            email: r.email,
            designation: r.designation,
            proof_document: r.proof_document,
            approval: r.approval,
        }
    }
}

const SELECT_OFFICERS: &str = r#"
    SELECT o.id, o.department_id, u.full_name, u.email,
           o.designation, o.proof_document, o.approval
    FROM officers o
    JOIN users u ON u.id = o.id
    WHERE NOT o.is_deleted AND NOT u.is_deleted
"#;

/// PostgreSQL implementation of OfficerRepository
pub struct PostgresOfficerRepository {
    pool: PgPool,
}

impl PostgresOfficerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfficerRepository for PostgresOfficerRepository {
    async fn create(&self, user: &User, officer: &Officer) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        insert_user(&mut tx, user)
            .await
            .map_err(|e| db_error("Failed to create officer account", e))?;

        sqlx::query(
            r#"
            INSERT INTO officers (id, department_id, designation, proof_document, approval)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(officer.id)
        .bind(officer.department_id)
        .bind(&officer.designation)
        .bind(&officer.proof_document)
        .bind(officer.approval)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to create officer", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit officer", e))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Officer>> {
        let sql = format!("{} AND o.id = $1", SELECT_OFFICERS);
        let row = sqlx::query_as::<_, OfficerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find officer", e))?;

        Ok(row.map(Officer::from))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Officer>> {
        let sql = format!("{} ORDER BY u.full_name", SELECT_OFFICERS);
        let rows = sqlx::query_as::<_, OfficerRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list officers", e))?;

        Ok(rows.into_iter().map(Officer::from).collect())
    }

    async fn find_by_approval(&self, approval: ApprovalStatus) -> RepositoryResult<Vec<Officer>> {
        let sql = format!("{} AND o.approval = $1 ORDER BY u.full_name", SELECT_OFFICERS);
        let rows = sqlx::query_as::<_, OfficerRow>(&sql)
            .bind(approval)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list officers by approval", e))?;

        Ok(rows.into_iter().map(Officer::from).collect())
    }

    async fn find_by_department(&self, department_id: Uuid) -> RepositoryResult<Vec<Officer>> {
        let sql = format!(
            "{} AND o.department_id = $1 ORDER BY u.full_name",
            SELECT_OFFICERS
        );
        let rows = sqlx::query_as::<_, OfficerRow>(&sql)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list officers by department", e))?;

        Ok(rows.into_iter().map(Officer::from).collect())
    }

    async fn save(&self, officer: &Officer) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE officers
            SET department_id = $2, designation = $3, proof_document = $4, approval = $5
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(officer.id)
        .bind(officer.department_id)
        .bind(&officer.designation)
        .bind(&officer.proof_document)
        .bind(officer.approval)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save officer", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Officer {}", officer.id)));
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let result = sqlx::query("UPDATE officers SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete officer", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Officer {}", id)));
        }

        sqlx::query("UPDATE users SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete officer account", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit officer deletion", e))
    }
}
