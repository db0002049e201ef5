use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::config::CONFIG;
use crate::error::Result;
use crate::models::prelude::*;
use crate::models::user::{self, Role};
use crate::services::hash_password;
use crate::state::DbConn;

const FALLBACK_PASSWORD: &str = "changemenow";

/// Ensure a super admin account exists, creating one from configuration on
/// first start. Idempotent.
pub async fn ensure_super_admin(db: &DbConn) -> Result<()> {
    let existing = User::find()
        .filter(user::Column::Role.eq(Role::SuperAdmin))
        .count(db)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let email = CONFIG.auth.super_admin_email.clone();
    let password = match &CONFIG.auth.super_admin_password {
        Some(p) => p.clone(),
        None => {
            tracing::warn!(
                "SITEKIT_SUPER_ADMIN_PASSWORD not set; seeding super admin with the \
                 default password, change it immediately"
            );
            FALLBACK_PASSWORD.to_string()
        }
    };

    let now = Utc::now();
    let admin = user::ActiveModel {
        email: Set(email.clone()),
        password_hash: Set(hash_password(&password)?),
        first_name: Set("Super".to_string()),
        last_name: Set("Admin".to_string()),
        role: Set(Role::SuperAdmin),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    admin.insert(db).await?;
    tracing::info!("Seeded super admin account {}", email);

    Ok(())
}
