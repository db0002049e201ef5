use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::Authenticated;
use crate::models::prelude::*;
use crate::models::user::{self, Role};
use crate::schemas::{ApiResponse, AuthData, LoginRequest, RegisterRequest, UpdateProfile, UserResponse};
use crate::services::{create_access_token, hash_password, verify_password};
use crate::state::AppState;

/// Create public auth routes (no token required)
pub fn public_auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

/// Create profile routes, mounted behind the auth middleware
pub fn profile_routes(state: AppState) -> Router {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .with_state(state)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Issue a token for the user and build the auth payload
fn auth_payload(found_user: user::Model) -> Result<AuthData> {
    let token = create_access_token(found_user.id, found_user.role, None)?;
    Ok(AuthData {
        user: UserResponse::from(found_user),
        token,
    })
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Register a new account, always with the USER role
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response> {
    payload.validate()?;

    // Check if email is taken
    let existing = User::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let hashed = hash_password(&payload.password)?;
    let now = Utc::now();

    let new_user = user::ActiveModel {
        email: Set(payload.email),
        password_hash: Set(hashed),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        role: Set(Role::User),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_user.insert(&state.db).await?;

    let data = auth_payload(created)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Registration successful", data)),
    )
        .into_response())
}

/// Login with email and password
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>> {
    payload.validate()?;

    // The same message covers unknown email and wrong password
    let found_user = User::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    // Deactivated accounts are rejected before the password is checked
    if !found_user.is_active {
        return Err(AppError::Unauthorized("Account is deactivated".to_string()));
    }

    if !verify_password(&payload.password, &found_user.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let data = auth_payload(found_user)?;
    Ok(Json(ApiResponse::with_message("Login successful", data)))
}

/// Get the authenticated user's profile
async fn get_profile(
    Authenticated(current): Authenticated,
) -> Result<Json<ApiResponse<UserResponse>>> {
    Ok(Json(ApiResponse::data(UserResponse::from(current))))
}

/// Update the authenticated user's name fields
async fn update_profile(
    Authenticated(current): Authenticated,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfile>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    payload.validate()?;

    let mut active: user::ActiveModel = current.into();
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(ApiResponse::with_message(
        "Profile updated",
        UserResponse::from(updated),
    )))
}
