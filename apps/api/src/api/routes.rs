use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    auth, categories, complaints, departments, grievances, notifications, officers,
};
use crate::api::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Builds the full application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.uploads.max_bytes() + MULTIPART_OVERHEAD;
    let uploads = ServeDir::new(state.uploads.root());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/register/officer", post(auth::register_officer))
        .route("/api/auth/login", post(auth::login))
        // Departments
        .route(
            "/api/departments",
            get(departments::list_departments).post(departments::create_department),
        )
        .route(
            "/api/departments/:id",
            get(departments::get_department)
                .put(departments::update_department)
                .delete(departments::delete_department),
        )
        .route(
            "/api/departments/:id/categories",
            get(departments::list_department_categories),
        )
        // Categories
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Officers
        .route("/api/officers", get(officers::list_officers))
        .route("/api/officers/pending", get(officers::list_pending_officers))
        .route(
            "/api/officers/department/:id",
            get(officers::list_department_officers),
        )
        .route("/api/officers/me/proof", post(officers::upload_proof))
        .route("/api/officers/:id/approve", post(officers::approve_officer))
        .route("/api/officers/:id/reject", post(officers::reject_officer))
        .route(
            "/api/officers/:id",
            delete(officers::delete_officer),
        )
        // Complaints
        .route(
            "/api/complaints",
            get(complaints::list_complaints).post(complaints::file_complaint),
        )
        .route(
            "/api/complaints/citizen",
            get(complaints::list_citizen_complaints),
        )
        .route(
            "/api/complaints/officer",
            get(complaints::list_officer_complaints),
        )
        .route(
            "/api/complaints/:id",
            get(complaints::get_complaint).delete(complaints::delete_complaint),
        )
        .route("/api/complaints/:id/assign", post(complaints::assign_complaint))
        .route("/api/complaints/:id/start", post(complaints::start_complaint))
        .route("/api/complaints/:id/resolve", post(complaints::resolve_complaint))
        .route("/api/complaints/:id/close", post(complaints::close_complaint))
        .route(
            "/api/complaints/:id/image",
            post(complaints::upload_complaint_image),
        )
        .route(
            "/api/complaints/:id/grievance",
            post(complaints::raise_grievance),
        )
        // Grievances
        .route("/api/grievances", get(grievances::list_grievances))
        .route(
            "/api/grievances/citizen",
            get(grievances::list_citizen_grievances),
        )
        .route(
            "/api/grievances/officer/:id",
            get(grievances::list_officer_grievances),
        )
        .route("/api/grievances/:id", get(grievances::get_grievance))
        .route(
            "/api/grievances/:id/reassign",
            post(grievances::reassign_grievance),
        )
        .route(
            "/api/grievances/:id/resolve",
            post(grievances::resolve_grievance),
        )
        .route(
            "/api/grievances/:id/image",
            post(grievances::upload_grievance_image),
        )
        // Notifications
        .route("/api/notifications", get(notifications::list_notifications))
        .route(
            "/api/notifications/:id/read",
            post(notifications::mark_notification_read),
        )
        .route(
            "/api/notifications/:id",
            delete(notifications::delete_notification),
        )
        // Uploaded files
        .nest_service("/uploads", uploads)
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
