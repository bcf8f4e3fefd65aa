use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::ApiPath;
use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::domain::notification::{Notification, Recipient};
use crate::domain::user::{Actor, Role};

fn recipient(actor: &Actor) -> Result<Recipient, ApiError> {
    match actor.role {
        Role::Officer => Ok(Recipient::Officer(actor.user_id)),
        Role::Citizen => Ok(Recipient::Citizen(actor.user_id)),
        Role::Admin => Err(ApiError::forbidden("Administrators do not receive notifications")),
    }
}

/// Loads a notification addressed to the caller; others' notifications
/// answer 404 so ids cannot be probed
async fn load_own(state: &AppState, actor: &Actor, id: Uuid) -> Result<Notification, ApiError> {
    state
        .notifications
        .find_by_id(id)
        .await?
        .filter(|n| n.belongs_to(actor))
        .ok_or_else(|| ApiError::not_found(format!("Notification not found: {}", id)))
}

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let recipient = recipient(&actor)?;
    Ok(Json(state.notifications.find_for(recipient).await?))
}

/// POST /api/notifications/:id/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let mut notification = load_own(&state, &actor, id).await?;
    if !notification.is_read {
        state.notifications.mark_read(id).await?;
        notification.is_read = true;
    }
    Ok(Json(notification))
}

/// DELETE /api/notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    load_own(&state, &actor, id).await?;
    state.notifications.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
