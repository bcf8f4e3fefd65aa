//! End-to-end API tests
//!
//! These drive the full router over the in-memory adapters:
//! - registration, login and role checks
//! - the complaint lifecycle and the grievance side branch
//! - soft deletes, notifications and multipart uploads

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use civictrack_api::api::{router, AppState};
use civictrack_api::infrastructure::uploads::FileStore;
use civictrack_api::services::bootstrap::ensure_admin;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for oneshot

const SECRET: &str = "test-secret";
const ADMIN_EMAIL: &str = "admin@city.gov";
const ADMIN_PASSWORD: &str = "admin-password";
const PASSWORD: &str = "password123";

struct TestApp {
    app: Router,
    _uploads: TempDir,
}

async fn setup_app() -> TestApp {
    let uploads = tempfile::tempdir().expect("temp dir");
    let state = AppState::in_memory(FileStore::new(uploads.path(), 1024 * 1024), SECRET);
    ensure_admin(state.users.as_ref(), ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("admin bootstrap");

    TestApp {
        app: router(state),
        _uploads: uploads,
    }
}

impl TestApp {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// POST with a raw JSON-typed body, for bodies `json!` cannot express
    async fn post_raw(&self, uri: &str, token: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    async fn citizen(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": PASSWORD,
                    "full_name": "Jane Citizen",
                    "phone": "+1 555 0100"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        self.login(email, PASSWORD).await
    }

    /// Registers an officer, approves it and returns (id, token)
    async fn officer(&self, admin: &str, email: &str, department_id: &str) -> (String, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register/officer",
                None,
                Some(json!({
                    "email": email,
                    "password": PASSWORD,
                    "full_name": "Sam Officer",
                    "department_id": department_id,
                    "designation": "Inspector"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "officer register failed: {}", body);
        let id = body["user_id"].as_str().unwrap().to_string();

        let (status, body) = self
            .post(&format!("/api/officers/{}/approve", id), admin, json!({}))
            .await;
        assert_eq!(status, StatusCode::OK, "approve failed: {}", body);
        assert_eq!(body["approval"], "approved");

        (id, self.login(email, PASSWORD).await)
    }

    /// Creates a department with one category; returns their ids
    async fn taxonomy(&self, admin: &str, name: &str) -> (String, String) {
        let (status, department) = self
            .post("/api/departments", admin, json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let department_id = department["id"].as_str().unwrap().to_string();

        let (status, category) = self
            .post(
                "/api/categories",
                admin,
                json!({ "department_id": department_id, "name": "General" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        (department_id, category["id"].as_str().unwrap().to_string())
    }

    async fn file_complaint(&self, citizen: &str, department_id: &str, category_id: &str) -> String {
        let (status, body) = self
            .post(
                "/api/complaints",
                citizen,
                json!({
                    "department_id": department_id,
                    "category_id": category_id,
                    "title": "Streetlight out",
                    "description": "Dark since Monday",
                    "location": "Elm St"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "file failed: {}", body);
        assert_eq!(body["status"], "pending");
        body["id"].as_str().unwrap().to_string()
    }
}

fn multipart_request(uri: &str, token: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "civictrack-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app().await;

    let response = app
        .app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_complaint_and_grievance_lifecycle() {
    let app = setup_app().await;
    let admin = app.admin().await;
    let (department_id, category_id) = app.taxonomy(&admin, "Public Works").await;
    let citizen = app.citizen("jane@example.com").await;
    let (first_id, first) = app.officer(&admin, "first@city.gov", &department_id).await;
    let (second_id, second) = app.officer(&admin, "second@city.gov", &department_id).await;

    let complaint_id = app.file_complaint(&citizen, &department_id, &category_id).await;
    let complaint_uri = format!("/api/complaints/{}", complaint_id);

    // Assignment keeps the complaint pending until the officer starts work
    let (status, body) = app
        .post(
            &format!("{}/assign", complaint_uri),
            &admin,
            json!({ "officer_id": first_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignment"]["officer_id"], first_id.as_str());
    assert_eq!(body["status"], "pending");

    // Cannot resolve without starting
    let (status, _) = app
        .post(&format!("{}/resolve", complaint_uri), &first, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Only the assigned officer may start
    let (status, _) = app
        .post(&format!("{}/start", complaint_uri), &second, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(&format!("{}/start", complaint_uri), &first, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");

    let (status, body) = app
        .post(
            &format!("{}/resolve", complaint_uri),
            &first,
            json!({ "resolution_note": "Bulb replaced" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resolved");
    assert_eq!(body["resolution_note"], "Bulb replaced");

    // Citizen disputes the resolution
    let (status, grievance) = app
        .post(
            &format!("{}/grievance", complaint_uri),
            &citizen,
            json!({ "reason": "Still dark at night" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(grievance["originating_officer_id"], first_id.as_str());
    let grievance_uri = format!("/api/grievances/{}", grievance["id"].as_str().unwrap());

    let (status, _) = app
        .post(
            &format!("{}/grievance", complaint_uri),
            &citizen,
            json!({ "reason": "Again" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Reassigning to the originating officer is rejected
    let (status, body) = app
        .post(
            &format!("{}/reassign", grievance_uri),
            &admin,
            json!({ "officer_id": first_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["officer_id"].is_string());

    let (status, body) = app
        .post(
            &format!("{}/reassign", grievance_uri),
            &admin,
            json!({ "officer_id": second_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");

    let (_, complaint) = app.get(&complaint_uri, &citizen).await;
    assert_eq!(complaint["status"], "in_progress");
    assert_eq!(complaint["assignment"]["officer_id"], second_id.as_str());

    // Only the reassigned officer may resolve the grievance
    let (status, _) = app
        .post(&format!("{}/resolve", grievance_uri), &first, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(
            &format!("{}/resolve", grievance_uri),
            &second,
            json!({ "resolution_note": "Wiring fixed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resolved");

    let (status, body) = app
        .post(&format!("{}/close", complaint_uri), &citizen, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");

    // Both officers see the grievance; the first officer can't list the second's
    let (status, list) = app
        .get(&format!("/api/grievances/officer/{}", second_id), &second)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (status, _) = app
        .get(&format!("/api/grievances/officer/{}", second_id), &first)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // filed, assigned, started, resolved, grievance reassigned, grievance resolved
    let (status, notifications) = app.get("/api/notifications", &citizen).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = notifications.as_array().unwrap();
    assert_eq!(notifications.len(), 6);
    assert!(notifications.iter().all(|n| n["is_read"] == false));

    let notification_id = notifications[0]["id"].as_str().unwrap();
    let (status, body) = app
        .post(
            &format!("/api/notifications/{}/read", notification_id),
            &citizen,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);

    // Someone else's notification looks missing
    let (status, _) = app
        .post(
            &format!("/api/notifications/{}/read", notification_id),
            &first,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_authentication_and_roles() {
    let app = setup_app().await;
    let citizen = app.citizen("role@example.com").await;

    let (status, _) = app
        .request(Method::GET, "/api/departments", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::GET, "/api/departments", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/api/departments", &citizen, json!({ "name": "Parks" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/complaints", &citizen).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/complaints/{}", uuid::Uuid::new_v4()), &citizen)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "role@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_validation() {
    let app = setup_app().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "short", "full_name": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_string());
    assert!(body["fields"]["password"].is_string());
    assert!(body["fields"]["full_name"].is_string());

    app.citizen("dup@example.com").await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "DUP@example.com", "password": PASSWORD, "full_name": "Dup" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register/officer",
            None,
            Some(json!({
                "email": "officer@city.gov",
                "password": PASSWORD,
                "full_name": "Officer",
                "department_id": uuid::Uuid::new_v4(),
                "designation": "Clerk"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["department_id"].is_string());
}

#[tokio::test]
async fn test_unapproved_officer_cannot_be_assigned() {
    let app = setup_app().await;
    let admin = app.admin().await;
    let (department_id, category_id) = app.taxonomy(&admin, "Sanitation").await;
    let citizen = app.citizen("pending@example.com").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/api/auth/register/officer",
            None,
            Some(json!({
                "email": "new@city.gov",
                "password": PASSWORD,
                "full_name": "New Officer",
                "department_id": department_id,
                "designation": "Driver"
            })),
        )
        .await;
    assert_eq!(body["role"], "officer");
    let officer_id = body["user_id"].as_str().unwrap().to_string();

    let (_, pending) = app.get("/api/officers/pending", &admin).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let complaint_id = app.file_complaint(&citizen, &department_id, &category_id).await;
    let (status, _) = app
        .post(
            &format!("/api/complaints/{}/assign", complaint_id),
            &admin,
            json!({ "officer_id": officer_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .post(&format!("/api/officers/{}/reject", officer_id), &admin, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approval"], "rejected");
}

#[tokio::test]
async fn test_soft_deleted_records_disappear() {
    let app = setup_app().await;
    let admin = app.admin().await;
    let (department_id, category_id) = app.taxonomy(&admin, "Roads").await;
    let citizen = app.citizen("delete@example.com").await;

    let complaint_id = app.file_complaint(&citizen, &department_id, &category_id).await;
    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/complaints/{}", complaint_id),
            Some(&citizen),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(&format!("/api/complaints/{}", complaint_id), &admin)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, mine) = app.get("/api/complaints/citizen", &citizen).await;
    assert!(mine.as_array().unwrap().is_empty());

    // Deleting a department takes its categories with it
    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/departments/{}", department_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(&format!("/api/categories/{}", category_id), &citizen)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, departments) = app.get("/api/departments", &citizen).await;
    assert!(departments.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_complaint_image_upload() {
    let app = setup_app().await;
    let admin = app.admin().await;
    let (department_id, category_id) = app.taxonomy(&admin, "Parks").await;
    let citizen = app.citizen("upload@example.com").await;
    let other = app.citizen("other@example.com").await;
    let complaint_id = app.file_complaint(&citizen, &department_id, &category_id).await;
    let uri = format!("/api/complaints/{}/image", complaint_id);

    let (status, body) = app
        .send(multipart_request(&uri, &citizen, "bench.png", b"\x89PNG fake"))
        .await;
    assert_eq!(status, StatusCode::OK, "upload failed: {}", body);
    let path = body["image_path"].as_str().unwrap().to_string();
    assert!(path.starts_with("complaints/"));
    assert!(path.ends_with(".png"));

    let response = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{}", path))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = app
        .send(multipart_request(&uri, &citizen, "scan.pdf", b"%PDF-1.4"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["file"].is_string());

    let (status, _) = app
        .send(multipart_request(&uri, &other, "bench.png", b"\x89PNG fake"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A replacement image takes the old file's place on disk
    let (status, body) = app
        .send(multipart_request(&uri, &citizen, "bench2.jpg", b"jpeg bytes"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["image_path"].as_str().unwrap(), path);
    let response = app
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{}", path))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_open_grievance_guards_complaint_endpoints() {
    let app = setup_app().await;
    let admin = app.admin().await;
    let (department_id, category_id) = app.taxonomy(&admin, "Water").await;
    let citizen = app.citizen("guard@example.com").await;
    let (first_id, first) = app.officer(&admin, "guard1@city.gov", &department_id).await;
    let (second_id, second) = app.officer(&admin, "guard2@city.gov", &department_id).await;

    let complaint_id = app.file_complaint(&citizen, &department_id, &category_id).await;
    let complaint_uri = format!("/api/complaints/{}", complaint_id);
    app.post(
        &format!("{}/assign", complaint_uri),
        &admin,
        json!({ "officer_id": first_id }),
    )
    .await;
    app.post(&format!("{}/start", complaint_uri), &first, json!({}))
        .await;
    let (status, _) = app
        .post(&format!("{}/resolve", complaint_uri), &first, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, grievance) = app
        .post(
            &format!("{}/grievance", complaint_uri),
            &citizen,
            json!({ "reason": "Pressure still low" }),
        )
        .await;
    let grievance_uri = format!("/api/grievances/{}", grievance["id"].as_str().unwrap());

    // Pending grievance: the citizen cannot accept the resolution any more
    let (status, _) = app
        .post(&format!("{}/close", complaint_uri), &citizen, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.post(
        &format!("{}/reassign", grievance_uri),
        &admin,
        json!({ "officer_id": second_id }),
    )
    .await;

    // In-progress grievance: the complaint only settles through the grievance
    let (status, _) = app
        .post(&format!("{}/resolve", complaint_uri), &second, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app
        .post(&format!("{}/close", complaint_uri), &citizen, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, complaint) = app.get(&complaint_uri, &citizen).await;
    assert_eq!(complaint["status"], "in_progress");
    let (_, grievance) = app.get(&grievance_uri, &citizen).await;
    assert_eq!(grievance["status"], "in_progress");

    let (status, _) = app
        .request(
            Method::POST,
            &format!("{}/resolve", grievance_uri),
            Some(&second),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&format!("{}/close", complaint_uri), &citizen, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
}

#[tokio::test]
async fn test_malformed_requests_are_bad_requests() {
    let app = setup_app().await;
    let admin = app.admin().await;
    let (department_id, category_id) = app.taxonomy(&admin, "Lighting").await;
    let citizen = app.citizen("malformed@example.com").await;
    let (officer_id, officer) = app.officer(&admin, "malformed@city.gov", &department_id).await;

    // Missing field
    let (status, body) = app
        .post(
            "/api/complaints",
            &citizen,
            json!({
                "department_id": department_id,
                "category_id": category_id,
                "description": "No title given"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["title"].is_string(), "body: {}", body);

    // Wrong type
    let (status, body) = app
        .post(
            "/api/complaints",
            &citizen,
            json!({
                "department_id": "not-a-uuid",
                "category_id": category_id,
                "title": "Dark street",
                "description": "Lamp out"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Syntax error
    let (status, body) = app.post_raw("/api/complaints", &citizen, "{\"title\":").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Bad path parameter
    let (status, body) = app.get("/api/complaints/not-a-uuid", &citizen).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // The resolve body is optional, but a present one must be valid
    let complaint_id = app.file_complaint(&citizen, &department_id, &category_id).await;
    let complaint_uri = format!("/api/complaints/{}", complaint_id);
    app.post(
        &format!("{}/assign", complaint_uri),
        &admin,
        json!({ "officer_id": officer_id }),
    )
    .await;
    app.post(&format!("{}/start", complaint_uri), &officer, json!({}))
        .await;

    let resolve_uri = format!("{}/resolve", complaint_uri);
    let (status, _) = app.post_raw(&resolve_uri, &officer, "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .post_raw(&resolve_uri, &officer, "{\"resolution_note\": 5}")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, complaint) = app.get(&complaint_uri, &citizen).await;
    assert_eq!(complaint["status"], "in_progress");

    let (status, body) = app
        .request(Method::POST, &resolve_uri, Some(&officer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resolved");
    assert!(body["resolution_note"].is_null());
}
