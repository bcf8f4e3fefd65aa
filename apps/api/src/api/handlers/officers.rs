use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::ApiPath;
use crate::api::handlers::{discard_upload, read_file_field};
use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::domain::officer::{ApprovalStatus, Officer};
use crate::domain::user::Role;
use crate::infrastructure::uploads::UploadKind;

async fn load(state: &AppState, id: Uuid) -> Result<Officer, ApiError> {
    state
        .officers
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Officer not found: {}", id)))
}

/// GET /api/officers
pub async fn list_officers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Officer>>, ApiError> {
    auth.require_admin()?;
    Ok(Json(state.officers.find_all().await?))
}

/// GET /api/officers/pending
pub async fn list_pending_officers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Officer>>, ApiError> {
    auth.require_admin()?;
    Ok(Json(
        state
            .officers
            .find_by_approval(ApprovalStatus::Pending)
            .await?,
    ))
}

/// GET /api/officers/department/:id
pub async fn list_department_officers(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(department_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Officer>>, ApiError> {
    auth.require_admin()?;
    Ok(Json(state.officers.find_by_department(department_id).await?))
}

/// POST /api/officers/:id/approve
pub async fn approve_officer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Officer>, ApiError> {
    let admin = auth.require_admin()?;

    let mut officer = load(&state, id).await?;
    officer.approve()?;
    state.officers.save(&officer).await?;

    tracing::info!(officer_id = %id, approved_by = %admin.user_id, "Officer approved");
    Ok(Json(officer))
}

/// POST /api/officers/:id/reject
pub async fn reject_officer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Officer>, ApiError> {
    let admin = auth.require_admin()?;

    let mut officer = load(&state, id).await?;
    officer.reject()?;
    state.officers.save(&officer).await?;

    tracing::info!(officer_id = %id, rejected_by = %admin.user_id, "Officer rejected");
    Ok(Json(officer))
}

/// DELETE /api/officers/:id
pub async fn delete_officer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;

    state.officers.soft_delete(id).await?;
    tracing::info!(officer_id = %id, "Officer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/officers/me/proof
///
/// Multipart upload of the calling officer's proof document.
pub async fn upload_proof(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Officer>, ApiError> {
    let actor = auth.require(Role::Officer)?;
    let mut officer = load(&state, actor.user_id).await?;

    let (file_name, bytes) = read_file_field(&mut multipart).await?;
    let path = state
        .uploads
        .save(UploadKind::OfficerProof, &file_name, &bytes)
        .await?;

    let replaced = officer.proof_document.replace(path.clone());
    if let Err(e) = state.officers.save(&officer).await {
        discard_upload(&state.uploads, &path).await;
        return Err(e.into());
    }
    if let Some(replaced) = replaced {
        discard_upload(&state.uploads, &replaced).await;
    }

    tracing::info!(officer_id = %officer.id, "Officer proof document uploaded");
    Ok(Json(officer))
}
