use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::domain::taxonomy::Category;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub department_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

async fn ensure_department(state: &AppState, department_id: Uuid) -> Result<(), ApiError> {
    match state.taxonomy.find_department(department_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::invalid_field("department_id", "Unknown department")),
    }
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.taxonomy.list_categories().await?))
}

/// GET /api/categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .taxonomy
        .find_category(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", id)))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    auth.require_admin()?;
    ensure_department(&state, req.department_id).await?;

    let category = Category::new(req.department_id, req.name, req.description)?;
    state.taxonomy.save_category(&category).await?;

    tracing::info!(
        category_id = %category.id,
        department_id = %category.department_id,
        "Category created"
    );
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    auth.require_admin()?;

    let mut category = state
        .taxonomy
        .find_category(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", id)))?;
    ensure_department(&state, req.department_id).await?;

    category.update(req.department_id, req.name, req.description)?;
    state.taxonomy.save_category(&category).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;

    state.taxonomy.delete_category(id).await?;
    tracing::info!(category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
