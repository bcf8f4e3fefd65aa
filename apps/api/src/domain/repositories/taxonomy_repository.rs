use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::taxonomy::{Category, Department};

/// Repository trait for departments and their categories
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    /// Insert or update a department; a duplicate live name is a conflict
    async fn save_department(&self, department: &Department) -> RepositoryResult<()>;

    async fn find_department(&self, id: Uuid) -> RepositoryResult<Option<Department>>;

    async fn list_departments(&self) -> RepositoryResult<Vec<Department>>;

    /// Soft delete a department together with its categories
    async fn delete_department(&self, id: Uuid) -> RepositoryResult<()>;

    /// Insert or update a category
    async fn save_category(&self, category: &Category) -> RepositoryResult<()>;

    async fn find_category(&self, id: Uuid) -> RepositoryResult<Option<Category>>;

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;

    async fn list_categories_by_department(
        &self,
        department_id: Uuid,
    ) -> RepositoryResult<Vec<Category>>;

    async fn delete_category(&self, id: Uuid) -> RepositoryResult<()>;
}
