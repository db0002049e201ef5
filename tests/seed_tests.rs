//! Tests for the super admin seed routine

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

mod common;
use common::{create_test_db, create_test_user, do_login};

use sitekit::endpoints::create_router;
use sitekit::models::prelude::*;
use sitekit::models::user::{self, Role};
use sitekit::seed::ensure_super_admin;

async fn count_super_admins(db: &sea_orm::DatabaseConnection) -> u64 {
    User::find()
        .filter(user::Column::Role.eq(Role::SuperAdmin))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_seed_creates_super_admin_once() {
    let db = create_test_db().await;
    assert_eq!(count_super_admins(&db).await, 0);

    ensure_super_admin(&db).await.unwrap();
    assert_eq!(count_super_admins(&db).await, 1);

    // A second run is a no-op
    ensure_super_admin(&db).await.unwrap();
    assert_eq!(count_super_admins(&db).await, 1);
}

#[tokio::test]
async fn test_seed_skips_when_super_admin_exists() {
    let db = create_test_db().await;
    create_test_user(&db, "custom-root@example.com", "password123", Role::SuperAdmin, true).await;

    ensure_super_admin(&db).await.unwrap();

    assert_eq!(count_super_admins(&db).await, 1);
    let survivor = User::find()
        .filter(user::Column::Role.eq(Role::SuperAdmin))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(survivor.email, "custom-root@example.com");
}

#[tokio::test]
async fn test_seeded_super_admin_can_log_in() {
    let db = create_test_db().await;
    ensure_super_admin(&db).await.unwrap();
    let seeded = User::find()
        .filter(user::Column::Role.eq(Role::SuperAdmin))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(seeded.is_active);

    let (state, _upload_dir) = common::build_test_state(db).await;
    // Default credentials apply when the env overrides are absent
    let (status, body) = do_login(create_router(state), &seeded.email, "changemenow").await;
    assert_eq!(status, axum::http::StatusCode::OK, "Body: {body}");
    assert_eq!(body["data"]["user"]["role"], "SUPER_ADMIN");
}
