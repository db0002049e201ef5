//! Test helpers and utilities for endpoint integration testing.
//!
//! Provides an in-memory database, request helpers and fixture users for
//! exercising the full router.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use tower::util::ServiceExt;

use sitekit::migrations::Migrator;
use sitekit::models::user::{self, Role};
use sitekit::services::{create_access_token, hash_password, MediaStorage};
use sitekit::state::AppState;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    // A single pooled connection keeps every query on the same in-memory
    // database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to create test database");

    // Run migrations using the Migrator
    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Build an `AppState` over the database with a throwaway upload directory.
///
/// The returned `TempDir` guard must be kept alive for the duration of the
/// test, dropping it deletes the directory.
pub async fn build_test_state(db: DatabaseConnection) -> (AppState, tempfile::TempDir) {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp upload dir");
    let storage = MediaStorage::new(upload_dir.path());
    storage.init().await.expect("Failed to init upload dir");
    (AppState::new(db, storage), upload_dir)
}

/// Insert a user with the given role and active flag
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    role: Role,
    is_active: bool,
) -> user::Model {
    let hashed = hash_password(password).unwrap();
    let now = chrono::Utc::now();

    let new_user = user::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set(hashed),
        first_name: Set("Test".to_string()),
        last_name: Set("User".to_string()),
        role: Set(role),
        is_active: Set(is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_user.insert(db).await.unwrap()
}

/// Issue a bearer token for the user
pub fn token_for(found_user: &user::Model) -> String {
    create_access_token(found_user.id, found_user.role, None).unwrap()
}

/// Send a request, optionally authenticated and with a JSON body, and
/// return (status, parsed body).
pub async fn request(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// POST /api/auth/login and return (status, parsed body)
pub async fn do_login(app: Router, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await
}
