use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::jwt::verify_token;
use crate::domain::user::{Actor, Role};

/// Bearer-token extractor for protected routes
///
/// Usage:
/// ```rust,ignore
/// async fn handler(AuthUser(actor): AuthUser) -> Result<String, ApiError> {
///     Ok(format!("Hello {} {}", actor.role, actor.user_id))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Actor);

impl AuthUser {
    /// Rejects with 403 unless the caller has `role`
    pub fn require(&self, role: Role) -> Result<Actor, ApiError> {
        if self.0.role == role {
            Ok(self.0)
        } else {
            Err(ApiError::forbidden(format!("Requires the {} role", role)))
        }
    }

    pub fn require_admin(&self) -> Result<Actor, ApiError> {
        self.require(Role::Admin)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>")
        })?;

        let claims = verify_token(token, &state.jwt_secret)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(AuthUser(claims.actor()))
    }
}
