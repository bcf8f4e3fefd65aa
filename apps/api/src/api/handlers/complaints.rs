use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath, OptionalJson};
use crate::api::handlers::grievances::{GrievanceResponse, RaiseGrievanceRequest};
use crate::api::handlers::{discard_upload, read_file_field};
use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::domain::complaint::{Complaint, ComplaintAssignment, ComplaintStatus};
use crate::infrastructure::uploads::UploadKind;
use crate::services::FileComplaint;

/// Request body for filing a complaint
#[derive(Debug, Deserialize)]
pub struct FileComplaintRequest {
    pub department_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub officer_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    pub resolution_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ComplaintResponse {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub department_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub image_path: Option<String>,
    pub status: ComplaintStatus,
    pub resolution_note: Option<String>,
    pub assignment: Option<ComplaintAssignment>,
    pub grievance_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<&Complaint> for ComplaintResponse {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id(),
            citizen_id: c.citizen_id(),
            department_id: c.department_id(),
            category_id: c.category_id(),
            title: c.title().to_string(),
            description: c.description().to_string(),
            location: c.location().map(str::to_string),
            image_path: c.image_path().map(str::to_string),
            status: c.status(),
            resolution_note: c.resolution_note().map(str::to_string),
            assignment: c.assignment().copied(),
            grievance_id: c.grievance_id(),
            created_at: c.created_at(),
            updated_at: c.updated_at(),
            resolved_at: c.resolved_at(),
            closed_at: c.closed_at(),
        }
    }
}

fn respond_many(complaints: Vec<Complaint>) -> Json<Vec<ComplaintResponse>> {
    Json(complaints.iter().map(ComplaintResponse::from).collect())
}

/// POST /api/complaints
pub async fn file_complaint(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(req): ApiJson<FileComplaintRequest>,
) -> Result<(StatusCode, Json<ComplaintResponse>), ApiError> {
    let complaint = state
        .complaint_service()
        .file(
            &actor,
            FileComplaint {
                department_id: req.department_id,
                category_id: req.category_id,
                title: req.title,
                description: req.description,
                location: req.location,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ComplaintResponse::from(&complaint))))
}

/// GET /api/complaints
pub async fn list_complaints(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<ComplaintResponse>>, ApiError> {
    Ok(respond_many(state.complaint_service().list_all(&actor).await?))
}

/// GET /api/complaints/citizen
pub async fn list_citizen_complaints(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<ComplaintResponse>>, ApiError> {
    Ok(respond_many(
        state.complaint_service().list_for_citizen(&actor).await?,
    ))
}

/// GET /api/complaints/officer
pub async fn list_officer_complaints(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<ComplaintResponse>>, ApiError> {
    Ok(respond_many(
        state.complaint_service().list_for_officer(&actor).await?,
    ))
}

/// GET /api/complaints/:id
pub async fn get_complaint(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ComplaintResponse>, ApiError> {
    let complaint = state.complaint_service().get(&actor, id).await?;
    Ok(Json(ComplaintResponse::from(&complaint)))
}

/// POST /api/complaints/:id/assign
pub async fn assign_complaint(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AssignRequest>,
) -> Result<Json<ComplaintResponse>, ApiError> {
    let complaint = state
        .complaint_service()
        .assign(&actor, id, req.officer_id)
        .await?;
    Ok(Json(ComplaintResponse::from(&complaint)))
}

/// POST /api/complaints/:id/start
pub async fn start_complaint(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ComplaintResponse>, ApiError> {
    let complaint = state.complaint_service().start(&actor, id).await?;
    Ok(Json(ComplaintResponse::from(&complaint)))
}

/// POST /api/complaints/:id/resolve
///
/// The body is optional; `{"resolution_note": "..."}` records a note.
pub async fn resolve_complaint(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    OptionalJson(req): OptionalJson<ResolveRequest>,
) -> Result<Json<ComplaintResponse>, ApiError> {
    let note = req.and_then(|r| r.resolution_note);
    let complaint = state.complaint_service().resolve(&actor, id, note).await?;
    Ok(Json(ComplaintResponse::from(&complaint)))
}

/// POST /api/complaints/:id/close
pub async fn close_complaint(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ComplaintResponse>, ApiError> {
    let complaint = state.complaint_service().close(&actor, id).await?;
    Ok(Json(ComplaintResponse::from(&complaint)))
}

/// POST /api/complaints/:id/image
pub async fn upload_complaint_image(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ComplaintResponse>, ApiError> {
    let service = state.complaint_service();
    service.ensure_image_owner(&actor, id).await?;

    let (file_name, bytes) = read_file_field(&mut multipart).await?;
    let path = state
        .uploads
        .save(UploadKind::ComplaintImage, &file_name, &bytes)
        .await?;

    let (complaint, replaced) = match service.attach_image(&actor, id, path.clone()).await {
        Ok(attached) => attached,
        Err(e) => {
            discard_upload(&state.uploads, &path).await;
            return Err(e.into());
        }
    };
    if let Some(replaced) = replaced {
        discard_upload(&state.uploads, &replaced).await;
    }
    Ok(Json(ComplaintResponse::from(&complaint)))
}

/// DELETE /api/complaints/:id
pub async fn delete_complaint(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.complaint_service().delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/complaints/:id/grievance
pub async fn raise_grievance(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<RaiseGrievanceRequest>,
) -> Result<(StatusCode, Json<GrievanceResponse>), ApiError> {
    let grievance = state
        .grievance_service()
        .raise(&actor, id, req.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(GrievanceResponse::from(&grievance))))
}
