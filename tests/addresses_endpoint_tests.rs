//! Address book endpoint integration tests
//!
//! Covers:
//! - `GET/POST /api/addresses`, `GET/PUT/DELETE /api/addresses/{id}` — per-user CRUD
//! - `PATCH /api/addresses/{id}/set-default` — single default per user
//! - owner scoping: one user can never see or touch another user's addresses

use axum::http::StatusCode;

mod common;
use common::{build_test_state, create_test_db, create_test_user, request, token_for};

use sitekit::endpoints::create_router;
use sitekit::models::user::Role;

fn address_payload(label: &str, is_default: bool) -> serde_json::Value {
    serde_json::json!({
        "label": label,
        "fullName": "Juan Pérez",
        "phone": "+52 55 1234 5678",
        "street": "Av. Reforma 123",
        "city": "Ciudad de México",
        "state": "CDMX",
        "zipCode": "06600",
        "isDefault": is_default
    })
}

// ============================================================================
// Access control
// ============================================================================

#[tokio::test]
async fn test_addresses_require_auth() {
    let db = create_test_db().await;
    let (state, _upload_dir) = build_test_state(db).await;

    let (status, _) = request(create_router(state), "GET", "/api/addresses", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_user_cannot_manage_addresses() {
    let db = create_test_db().await;
    let frozen = create_test_user(&db, "frozen@example.com", "password123", Role::User, false).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&frozen);

    let (status, body) = request(
        create_router(state),
        "GET",
        "/api/addresses",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN, "Body: {body}");
    assert_eq!(body["message"], "Account is deactivated");
}

// ============================================================================
// Create and list
// ============================================================================

#[tokio::test]
async fn test_create_and_list_addresses() {
    let db = create_test_db().await;
    let owner = create_test_user(&db, "owner@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&owner);

    let (status, body) = request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Casa", false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Body: {body}");
    assert_eq!(body["message"], "Address created");
    assert_eq!(body["data"]["userId"], owner.id);
    assert_eq!(
        body["data"]["country"], "México",
        "Country defaults when omitted. Body: {body}"
    );

    request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Oficina", true)),
    )
    .await;

    let (status, list) = request(
        create_router(state),
        "GET",
        "/api/addresses",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {list}");
    let rows = list["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Default address sorts first
    assert_eq!(rows[0]["label"], "Oficina");
    assert_eq!(rows[0]["isDefault"], true);
}

#[tokio::test]
async fn test_address_validation() {
    let db = create_test_db().await;
    let owner = create_test_user(&db, "owner@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&owner);

    let mut bad_zip = address_payload("Casa", false);
    bad_zip["zipCode"] = serde_json::json!("1234");
    let (status, body) = request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(bad_zip),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Body: {body}");
    assert!(body["errors"]["zip_code"].is_array(), "Body: {body}");

    let mut bad_phone = address_payload("Casa", false);
    bad_phone["phone"] = serde_json::json!("call me maybe");
    let (status, body) = request(
        create_router(state),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(bad_phone),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "Body: {body}");
    assert!(body["errors"]["phone"].is_array(), "Body: {body}");
}

// ============================================================================
// Default address exclusivity
// ============================================================================

/// Returns (label, isDefault) pairs from a list response.
fn defaults_of(list: &serde_json::Value) -> Vec<(String, bool)> {
    list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["label"].as_str().unwrap().to_owned(),
                row["isDefault"].as_bool().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_create_default_clears_previous() {
    let db = create_test_db().await;
    let owner = create_test_user(&db, "owner@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&owner);

    request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Casa", true)),
    )
    .await;
    request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Oficina", true)),
    )
    .await;

    let (_, list) = request(
        create_router(state),
        "GET",
        "/api/addresses",
        Some(&token),
        None,
    )
    .await;
    let defaults = defaults_of(&list);
    let default_labels: Vec<&str> = defaults
        .iter()
        .filter(|(_, is_default)| *is_default)
        .map(|(label, _)| label.as_str())
        .collect();
    assert_eq!(
        default_labels,
        vec!["Oficina"],
        "Exactly one default may survive. Body: {list}"
    );
}

#[tokio::test]
async fn test_update_default_clears_previous() {
    let db = create_test_db().await;
    let owner = create_test_user(&db, "owner@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&owner);

    request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Casa", true)),
    )
    .await;
    let (_, second) = request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Oficina", false)),
    )
    .await;
    let second_id = second["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        create_router(state.clone()),
        "PUT",
        &format!("/api/addresses/{second_id}"),
        Some(&token),
        Some(address_payload("Oficina", true)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {body}");

    let (_, list) = request(
        create_router(state),
        "GET",
        "/api/addresses",
        Some(&token),
        None,
    )
    .await;
    let defaults = defaults_of(&list);
    assert_eq!(
        defaults.iter().filter(|(_, d)| *d).count(),
        1,
        "Body: {list}"
    );
    assert!(defaults.contains(&("Oficina".to_owned(), true)));
    assert!(defaults.contains(&("Casa".to_owned(), false)));
}

#[tokio::test]
async fn test_set_default_endpoint() {
    let db = create_test_db().await;
    let owner = create_test_user(&db, "owner@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&owner);

    request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Casa", true)),
    )
    .await;
    let (_, second) = request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Oficina", false)),
    )
    .await;
    let second_id = second["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        create_router(state.clone()),
        "PATCH",
        &format!("/api/addresses/{second_id}/set-default"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {body}");
    assert_eq!(body["message"], "Default address set");
    assert_eq!(body["data"]["isDefault"], true);

    let (_, list) = request(
        create_router(state),
        "GET",
        "/api/addresses",
        Some(&token),
        None,
    )
    .await;
    let defaults = defaults_of(&list);
    assert_eq!(defaults.iter().filter(|(_, d)| *d).count(), 1, "Body: {list}");
    assert!(defaults.contains(&("Oficina".to_owned(), true)));
}

// ============================================================================
// Owner scoping
// ============================================================================

#[tokio::test]
async fn test_addresses_are_owner_scoped() {
    let db = create_test_db().await;
    let owner = create_test_user(&db, "owner@example.com", "password123", Role::User, true).await;
    let other = create_test_user(&db, "other@example.com", "password123", Role::Admin, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let owner_token = token_for(&owner);
    let other_token = token_for(&other);

    let (_, created) = request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&owner_token),
        Some(address_payload("Casa", true)),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/addresses/{id}");

    // Even an admin sees only their own address book
    let (status, _) = request(create_router(state.clone()), "GET", &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = request(
        create_router(state.clone()),
        "PUT",
        &uri,
        Some(&other_token),
        Some(address_payload("Robada", false)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = request(
        create_router(state.clone()),
        "DELETE",
        &uri,
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner still reaches it
    let (status, body) = request(create_router(state), "GET", &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK, "Body: {body}");
}

#[tokio::test]
async fn test_delete_address() {
    let db = create_test_db().await;
    let owner = create_test_user(&db, "owner@example.com", "password123", Role::User, true).await;
    let (state, _upload_dir) = build_test_state(db).await;
    let token = token_for(&owner);

    let (_, created) = request(
        create_router(state.clone()),
        "POST",
        "/api/addresses",
        Some(&token),
        Some(address_payload("Temporal", false)),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        create_router(state.clone()),
        "DELETE",
        &format!("/api/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Body: {body}");
    assert_eq!(body["message"], "Address deleted");

    let (status, _) = request(
        create_router(state),
        "GET",
        &format!("/api/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
