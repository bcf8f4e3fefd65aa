use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath, OptionalJson};
use crate::api::handlers::complaints::ResolveRequest;
use crate::api::handlers::{discard_upload, read_file_field};
use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::domain::grievance::{Grievance, GrievanceStatus};
use crate::infrastructure::uploads::UploadKind;

#[derive(Debug, Deserialize)]
pub struct RaiseGrievanceRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub officer_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct GrievanceResponse {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub citizen_id: Uuid,
    pub originating_officer_id: Uuid,
    pub reassigned_officer_id: Option<Uuid>,
    pub reason: String,
    pub image_path: Option<String>,
    pub status: GrievanceStatus,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<&Grievance> for GrievanceResponse {
    fn from(g: &Grievance) -> Self {
        Self {
            id: g.id(),
            complaint_id: g.complaint_id(),
            citizen_id: g.citizen_id(),
            originating_officer_id: g.originating_officer_id(),
            reassigned_officer_id: g.reassigned_officer_id(),
            reason: g.reason().to_string(),
            image_path: g.image_path().map(str::to_string),
            status: g.status(),
            resolution_note: g.resolution_note().map(str::to_string),
            created_at: g.created_at(),
            updated_at: g.updated_at(),
            resolved_at: g.resolved_at(),
        }
    }
}

fn respond_many(grievances: Vec<Grievance>) -> Json<Vec<GrievanceResponse>> {
    Json(grievances.iter().map(GrievanceResponse::from).collect())
}

/// GET /api/grievances
pub async fn list_grievances(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<GrievanceResponse>>, ApiError> {
    Ok(respond_many(state.grievance_service().list_all(&actor).await?))
}

/// GET /api/grievances/citizen
pub async fn list_citizen_grievances(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<GrievanceResponse>>, ApiError> {
    Ok(respond_many(
        state.grievance_service().list_for_citizen(&actor).await?,
    ))
}

/// GET /api/grievances/officer/:id
pub async fn list_officer_grievances(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(officer_id): ApiPath<Uuid>,
) -> Result<Json<Vec<GrievanceResponse>>, ApiError> {
    Ok(respond_many(
        state
            .grievance_service()
            .list_for_officer(&actor, officer_id)
            .await?,
    ))
}

/// GET /api/grievances/:id
pub async fn get_grievance(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<GrievanceResponse>, ApiError> {
    let grievance = state.grievance_service().get(&actor, id).await?;
    Ok(Json(GrievanceResponse::from(&grievance)))
}

/// POST /api/grievances/:id/reassign
pub async fn reassign_grievance(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ReassignRequest>,
) -> Result<Json<GrievanceResponse>, ApiError> {
    let grievance = state
        .grievance_service()
        .reassign(&actor, id, req.officer_id)
        .await?;
    Ok(Json(GrievanceResponse::from(&grievance)))
}

/// POST /api/grievances/:id/resolve
pub async fn resolve_grievance(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    OptionalJson(req): OptionalJson<ResolveRequest>,
) -> Result<Json<GrievanceResponse>, ApiError> {
    let note = req.and_then(|r| r.resolution_note);
    let grievance = state
        .grievance_service()
        .resolve(&actor, id, note)
        .await?;
    Ok(Json(GrievanceResponse::from(&grievance)))
}

/// POST /api/grievances/:id/image
pub async fn upload_grievance_image(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<GrievanceResponse>, ApiError> {
    let service = state.grievance_service();
    service.ensure_image_owner(&actor, id).await?;

    let (file_name, bytes) = read_file_field(&mut multipart).await?;
    let path = state
        .uploads
        .save(UploadKind::GrievanceImage, &file_name, &bytes)
        .await?;

    let (grievance, replaced) = match service.attach_image(&actor, id, path.clone()).await {
        Ok(attached) => attached,
        Err(e) => {
            discard_upload(&state.uploads, &path).await;
            return Err(e.into());
        }
    };
    if let Some(replaced) = replaced {
        discard_upload(&state.uploads, &replaced).await;
    }
    Ok(Json(GrievanceResponse::from(&grievance)))
}
