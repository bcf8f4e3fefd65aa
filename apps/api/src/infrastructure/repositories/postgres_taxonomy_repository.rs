use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::TaxonomyRepository;
use crate::domain::taxonomy::{Category, Department};

#[derive(sqlx::FromRow)]
struct DepartmentRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DepartmentRow> for Department {
    fn from(r: DepartmentRow) -> Self {
        Department {
            id: r.id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    department_id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category {
            id: r.id,
            department_id: r.department_id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL implementation of TaxonomyRepository
pub struct PostgresTaxonomyRepository {
    pool: PgPool,
}

impl PostgresTaxonomyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaxonomyRepository for PostgresTaxonomyRepository {
    async fn save_department(&self, department: &Department) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO departments (id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description
            "#,
        )
        .bind(department.id)
        .bind(&department.name)
        .bind(&department.description)
        .bind(department.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save department", e))?;

        Ok(())
    }

    async fn find_department(&self, id: Uuid) -> RepositoryResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, name, description, created_at
            FROM departments
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find department", e))?;

        Ok(row.map(Department::from))
    }

    async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, name, description, created_at
            FROM departments
            WHERE NOT is_deleted
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list departments", e))?;

        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn delete_department(&self, id: Uuid) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let result =
            sqlx::query("UPDATE departments SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to delete department", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Department {}", id)));
        }

        sqlx::query("UPDATE categories SET is_deleted = TRUE WHERE department_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete department categories", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit department deletion", e))
    }

    async fn save_category(&self, category: &Category) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, department_id, name, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                department_id = EXCLUDED.department_id,
                name = EXCLUDED.name,
                description = EXCLUDED.description
            "#,
        )
        .bind(category.id)
        .bind(category.department_id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save category", e))?;

        Ok(())
    }

    async fn find_category(&self, id: Uuid) -> RepositoryResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, department_id, name, description, created_at
            FROM categories
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find category", e))?;

        Ok(row.map(Category::from))
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, department_id, name, description, created_at
            FROM categories
            WHERE NOT is_deleted
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list categories", e))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn list_categories_by_department(
        &self,
        department_id: Uuid,
    ) -> RepositoryResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, department_id, name, description, created_at
            FROM categories
            WHERE department_id = $1 AND NOT is_deleted
            ORDER BY name
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list categories by department", e))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn delete_category(&self, id: Uuid) -> RepositoryResult<()> {
        let result =
            sqlx::query("UPDATE categories SET is_deleted = TRUE WHERE id = $1 AND NOT is_deleted")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to delete category", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Category {}", id)));
        }
        Ok(())
    }
}
