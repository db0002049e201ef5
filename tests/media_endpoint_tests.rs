//! Media endpoint integration tests
//!
//! Covers:
//! - `POST /api/cms/media/upload` — multipart upload, admin only, file lands on disk
//! - `GET /api/cms/media` — authenticated reads with type/search filters
//! - `PUT/DELETE /api/cms/media/{id}` — metadata update and delete with file cleanup

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

mod common;
use common::{build_test_state, create_test_db, create_test_user, request, token_for};

use sitekit::endpoints::create_router;
use sitekit::models::user::Role;

const BOUNDARY: &str = "sitekit-test-boundary";

/// Send a multipart upload with a `file` part and optional `alt`/`caption`
/// text parts.
async fn upload(
    app: Router,
    token: Option<&str>,
    filename: &str,
    content_type: &str,
    data: &[u8],
    alt: Option<&str>,
    caption: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut body: Vec<u8> = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    for (name, value) in [("alt", alt), ("caption", caption)] {
        if let Some(value) = value {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .uri("/api/cms/media/upload")
        .method("POST")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = builder.body(Body::from(body)).unwrap();

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_upload_requires_admin() {
    let db = create_test_db().await;
    let regular = create_test_user(&db, "user@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;

    let (status, _) = upload(
        create_router(state.clone()),
        None,
        "photo.png",
        "image/png",
        b"pngdata",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = token_for(&regular);
    let (status, body) = upload(
        create_router(state),
        Some(&token),
        "photo.png",
        "image/png",
        b"pngdata",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "Body: {body}");
}

#[tokio::test]
async fn test_upload_stores_file_and_metadata() {
    let db = create_test_db().await;
    let admin = create_test_user(&db, "admin@example.com", "password123", Role::Admin, true).await;
    let regular = create_test_user(&db, "viewer@example.com", "password123", Role::User, true).await;
    let (state, upload_dir) = build_test_state(db).await;
    let token = token_for(&admin);

    let payload = b"fake png bytes";
    let (status, body) = upload(
        create_router(state.clone()),
        Some(&token),
        "photo.png",
        "image/png",
        payload,
        Some("A test photo"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "Body: {body}");
    assert_eq!(body["message"], "File uploaded");
    assert_eq!(body["data"]["originalName"], "photo.png");
    assert_eq!(body["data"]["mimeType"], "image/png");
    assert_eq!(body["data"]["size"], payload.len());
    assert_eq!(body["data"]["alt"], "A test photo");
    assert_eq!(body["data"]["uploadedBy"]["email"], "admin@example.com");
    let url = body["data"]["url"].as_str().unwrap();
    assert!(url.contains("/uploads/"), "Body: {body}");

    let filename = body["data"]["filename"].as_str().unwrap();
    let stored = upload_dir.path().join(filename);
    assert_eq!(std::fs::read(&stored).unwrap(), payload);

    // Any active account can read it back
    let id = body["data"]["id"].as_i64().unwrap();
    let viewer_token = token_for(&regular);
    let (status, fetched) = request(
        create_router(state),
        "GET",
        &format!("/api/cms/media/{id}"),
        Some(&viewer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {fetched}");
    assert_eq!(fetched["data"]["filename"], filename);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let db = create_test_db().await;
    let admin = create_test_user(&db, "admin@example.com", "password123", Role::Admin, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&admin);

    // Only text fields, no file part
    let mut body: Vec<u8> = Vec::new();
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"alt\"\r\n\r\nno file\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    let req = Request::builder()
        .uri("/api/cms/media/upload")
        .method("POST")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();

    let response = create_router(state).oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST, "Body: {json}");
    assert_eq!(json["message"], "No file provided");
}

#[tokio::test]
async fn test_upload_empty_file_rejected() {
    let db = create_test_db().await;
    let admin = create_test_user(&db, "admin@example.com", "password123", Role::Admin, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&admin);

    let (status, body) = upload(
        create_router(state),
        Some(&token),
        "empty.txt",
        "text/plain",
        b"",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "Body: {body}");
    assert_eq!(body["message"], "Uploaded file is empty");
}

// ============================================================================
// List and filters
// ============================================================================

#[tokio::test]
async fn test_list_media_requires_auth() {
    let db = create_test_db().await;
    let regular = create_test_user(&db, "user@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;

    let (status, _) = request(create_router(state.clone()), "GET", "/api/cms/media", None, None).await;
    assert_eq!(
        status,
        StatusCode::UNAUTHORIZED,
        "Media listing is not public"
    );

    let token = token_for(&regular);
    let (status, body) = request(
        create_router(state),
        "GET",
        "/api/cms/media",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {body}");
}

#[tokio::test]
async fn test_list_media_filters() {
    let db = create_test_db().await;
    let admin = create_test_user(&db, "admin@example.com", "password123", Role::Admin, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&admin);

    upload(
        create_router(state.clone()),
        Some(&token),
        "photo.png",
        "image/png",
        b"pngdata",
        None,
        None,
    )
    .await;
    upload(
        create_router(state.clone()),
        Some(&token),
        "report.pdf",
        "application/pdf",
        b"pdfdata",
        None,
        None,
    )
    .await;

    let (_, images) = request(
        create_router(state.clone()),
        "GET",
        "/api/cms/media?type=image",
        Some(&token),
        None,
    )
    .await;
    let rows = images["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1, "Body: {images}");
    assert_eq!(rows[0]["originalName"], "photo.png");

    let (_, searched) = request(
        create_router(state),
        "GET",
        "/api/cms/media?search=report",
        Some(&token),
        None,
    )
    .await;
    let rows = searched["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1, "Body: {searched}");
    assert_eq!(rows[0]["originalName"], "report.pdf");
}

// ============================================================================
// Update and delete
// ============================================================================

#[tokio::test]
async fn test_update_media_metadata() {
    let db = create_test_db().await;
    let admin = create_test_user(&db, "admin@example.com", "password123", Role::Admin, true).await;
    let regular = create_test_user(&db, "user@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&admin);

    let (_, created) = upload(
        create_router(state.clone()),
        Some(&token),
        "banner.jpg",
        "image/jpeg",
        b"jpegdata",
        None,
        None,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/cms/media/{id}");

    let (status, body) = request(
        create_router(state.clone()),
        "PUT",
        &uri,
        Some(&token),
        Some(serde_json::json!({ "alt": "Banner", "caption": "Homepage banner" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {body}");
    assert_eq!(body["message"], "Media updated");
    assert_eq!(body["data"]["alt"], "Banner");
    assert_eq!(body["data"]["caption"], "Homepage banner");

    let viewer_token = token_for(&regular);
    let (status, body) = request(
        create_router(state),
        "PUT",
        &uri,
        Some(&viewer_token),
        Some(serde_json::json!({ "alt": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "Body: {body}");
}

#[tokio::test]
async fn test_delete_media_removes_file() {
    let db = create_test_db().await;
    let admin = create_test_user(&db, "admin@example.com", "password123", Role::Admin, true).await;
    let (state, upload_dir) = build_test_state(db).await;
    let token = token_for(&admin);

    let (_, created) = upload(
        create_router(state.clone()),
        Some(&token),
        "temp.txt",
        "text/plain",
        b"temporary",
        None,
        None,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let filename = created["data"]["filename"].as_str().unwrap().to_owned();
    let stored = upload_dir.path().join(&filename);
    assert!(stored.exists());

    let (status, body) = request(
        create_router(state.clone()),
        "DELETE",
        &format!("/api/cms/media/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {body}");
    assert_eq!(body["message"], "Media deleted");
    assert!(!stored.exists(), "Stored file must be removed with the row");

    let (status, _) = request(
        create_router(state),
        "GET",
        &format!("/api/cms/media/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_media_not_found() {
    let db = create_test_db().await;
    let regular = create_test_user(&db, "user@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&regular);

    let (status, body) = request(
        create_router(state),
        "GET",
        "/api/cms/media/9999",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND, "Body: {body}");
    assert_eq!(body["message"], "Media not found");
}
