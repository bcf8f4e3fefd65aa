use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::domain::taxonomy::{Category, Department};

/// Request body for creating or updating a department
#[derive(Debug, Deserialize)]
pub struct DepartmentRequest {
    pub name: String,
    pub description: Option<String>,
}

async fn load(state: &AppState, id: Uuid) -> Result<Department, ApiError> {
    state
        .taxonomy
        .find_department(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Department not found: {}", id)))
}

fn name_taken(err: ApiError) -> ApiError {
    if err.status == StatusCode::CONFLICT {
        ApiError::conflict("A department with this name already exists")
    } else {
        err
    }
}

/// GET /api/departments
pub async fn list_departments(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Department>>, ApiError> {
    Ok(Json(state.taxonomy.list_departments().await?))
}

/// GET /api/departments/:id
pub async fn get_department(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Department>, ApiError> {
    Ok(Json(load(&state, id).await?))
}

/// POST /api/departments
pub async fn create_department(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<DepartmentRequest>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    auth.require_admin()?;

    let department = Department::new(req.name, req.description)?;
    state
        .taxonomy
        .save_department(&department)
        .await
        .map_err(|e| name_taken(e.into()))?;

    tracing::info!(department_id = %department.id, name = %department.name, "Department created");
    Ok((StatusCode::CREATED, Json(department)))
}

/// PUT /api/departments/:id
pub async fn update_department(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<DepartmentRequest>,
) -> Result<Json<Department>, ApiError> {
    auth.require_admin()?;

    let mut department = load(&state, id).await?;
    department.rename(req.name, req.description)?;
    state
        .taxonomy
        .save_department(&department)
        .await
        .map_err(|e| name_taken(e.into()))?;

    Ok(Json(department))
}

/// DELETE /api/departments/:id
///
/// Soft deletes the department together with its categories.
pub async fn delete_department(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;

    state.taxonomy.delete_department(id).await?;
    tracing::info!(department_id = %id, "Department deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/departments/:id/categories
pub async fn list_department_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<Category>>, ApiError> {
    load(&state, id).await?;
    Ok(Json(state.taxonomy.list_categories_by_department(id).await?))
}
