use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::ApiJson;
use crate::api::state::AppState;
use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password, is_acceptable, verify_password, PASSWORD_MIN_LEN};
use crate::domain::errors::{DomainError, Validator};
use crate::domain::officer::{ApprovalStatus, Officer};
use crate::domain::repositories::User;
use crate::domain::user::{Email, Role};

const NAME_MAX: usize = 100;
const PHONE_MAX: usize = 20;

/// Request body for citizen registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Request body for officer registration; the account waits for approval
#[derive(Debug, Deserialize)]
pub struct RegisterOfficerRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub department_id: Uuid,
    pub designation: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub role: Role,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub role: Role,
    pub full_name: String,
}

/// Validates the fields every account shares and builds the user row
fn new_user(
    v: &mut Validator,
    email: &str,
    password: &str,
    full_name: &str,
    phone: Option<String>,
) -> Option<(Email, String, Option<String>)> {
    let email = match Email::new(email) {
        Ok(email) => Some(email),
        Err(e) => {
            v.check(false, "email", e);
            None
        }
    };
    v.check(
        is_acceptable(password),
        "password",
        format!("Password must be at least {} characters", PASSWORD_MIN_LEN),
    );
    v.text("full_name", full_name, NAME_MAX);

    let phone = phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    if let Some(phone) = &phone {
        v.check(
            phone.len() <= PHONE_MAX
                && phone.chars().all(|c| c.is_ascii_digit() || "+- ()".contains(c)),
            "phone",
            "Invalid phone number",
        );
    }

    email.map(|email| (email, full_name.trim().to_string(), phone))
}

fn duplicate_email(err: DomainError) -> ApiError {
    match err {
        DomainError::Conflict(_) => ApiError::conflict("Email already registered"),
        other => other.into(),
    }
}

/// Register a citizen account
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let mut v = Validator::new();
    let parsed = new_user(
        &mut v,
        &req.email,
        &req.password,
        &req.full_name,
        req.phone,
    );
    v.finish()?;
    let (email, full_name, phone) =
        parsed.ok_or_else(|| ApiError::invalid_field("email", "Invalid email"))?;

    let password_hash = hash_password(&req.password)?;
    let user_id = state
        .users
        .create(User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            phone,
            role: Role::Citizen,
            is_active: true,
        })
        .await
        .map_err(|e| duplicate_email(e.into()))?;

    tracing::info!(user_id = %user_id, "Citizen registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id,
            role: Role::Citizen,
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Register an officer account pending administrator approval
///
/// POST /api/auth/register/officer
pub async fn register_officer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterOfficerRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let department = state.taxonomy.find_department(req.department_id).await?;

    let mut v = Validator::new();
    let parsed = new_user(
        &mut v,
        &req.email,
        &req.password,
        &req.full_name,
        req.phone,
    );
    v.text("designation", &req.designation, NAME_MAX);
    v.check(department.is_some(), "department_id", "Unknown department");
    v.finish()?;
    let (email, full_name, phone) =
        parsed.ok_or_else(|| ApiError::invalid_field("email", "Invalid email"))?;

    let password_hash = hash_password(&req.password)?;
    let user = User {
        id: Uuid::new_v4(),
        email,
        password_hash,
        full_name,
        phone,
        role: Role::Officer,
        is_active: true,
    };
    let officer = Officer {
        id: user.id,
        department_id: req.department_id,
        full_name: user.full_name.clone(),
        email: user.email.to_string(),
        designation: req.designation.trim().to_string(),
        proof_document: None,
        approval: ApprovalStatus::Pending,
    };

    state
        .officers
        .create(&user, &officer)
        .await
        .map_err(|e| duplicate_email(e.into()))?;

    tracing::info!(
        user_id = %user.id,
        department_id = %officer.department_id,
        "Officer registered, awaiting approval"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            role: Role::Officer,
            message: "Officer registered; awaiting approval".to_string(),
        }),
    ))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = Email::new(&req.email).map_err(|e| ApiError::invalid_field("email", e))?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Account is disabled"));
    }

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Rejected login");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if let Err(e) = state.users.update_last_login(user.id).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to record last login");
    }

    let token = create_token(user.id, user.role, &state.jwt_secret)?;

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        role: user.role,
        full_name: user.full_name,
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
