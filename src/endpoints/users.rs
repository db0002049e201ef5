use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{AdminOrAbove, Authorized};
use crate::middleware::policy::{
    check_role_assignment, check_role_change, check_status_toggle, check_user_delete,
};
use crate::models::prelude::*;
use crate::models::user;
use crate::schemas::{ApiResponse, CreateUser, UpdateUser, UserQuery, UserResponse};
use crate::services::hash_password;
use crate::state::AppState;

/// Create user management routes, admin access only
pub fn users_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/{user_id}/toggle-status", patch(toggle_status))
        .with_state(state)
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn find_user(state: &AppState, user_id: i64) -> Result<user::Model> {
    User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Check whether another account already uses the email
async fn email_taken(state: &AppState, email: &str, exclude_id: Option<i64>) -> Result<bool> {
    let mut query = User::find().filter(user::Column::Email.eq(email));
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.one(&state.db).await?.is_some())
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List users with optional role, status and search filters
async fn list_users(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>> {
    let mut query = User::find();
    if let Some(role) = params.role {
        query = query.filter(user::Column::Role.eq(role));
    }
    if let Some(is_active) = params.is_active {
        query = query.filter(user::Column::IsActive.eq(is_active));
    }
    if let Some(search) = params.search.filter(|s| !s.is_empty()) {
        query = query.filter(
            user::Column::Email
                .contains(&search)
                .or(user::Column::FirstName.contains(&search))
                .or(user::Column::LastName.contains(&search)),
        );
    }

    let users = query
        .order_by_desc(user::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::data(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// Get a user by ID
async fn get_user(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let found_user = find_user(&state, user_id).await?;
    Ok(Json(ApiResponse::data(UserResponse::from(found_user))))
}

/// Create a user with an explicit role
async fn create_user(
    Authorized(actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<Response> {
    payload.validate()?;
    check_role_assignment(actor.role, payload.role)?;

    if email_taken(&state, &payload.email, None).await? {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let hashed = hash_password(&payload.password)?;
    let now = Utc::now();

    let new_user = user::ActiveModel {
        email: Set(payload.email),
        password_hash: Set(hashed),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        role: Set(payload.role),
        is_active: Set(payload.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_user.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User created",
            UserResponse::from(created),
        )),
    )
        .into_response())
}

/// Update a user's fields, credentials and role
async fn update_user(
    Authorized(actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    payload.validate()?;

    let target = find_user(&state, user_id).await?;

    if let Some(requested_role) = payload.role {
        check_role_change(actor.role, &target, requested_role)?;
    }
    if let Some(ref email) = payload.email {
        if email != &target.email && email_taken(&state, email, Some(user_id)).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }
    }

    let mut active: user::ActiveModel = target.into();
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(password) = payload.password {
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(ApiResponse::with_message(
        "User updated",
        UserResponse::from(updated),
    )))
}

/// Delete a user
async fn delete_user(
    Authorized(actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let target = find_user(&state, user_id).await?;
    check_user_delete(&actor, &target)?;

    target.delete(&state.db).await?;

    Ok(Json(ApiResponse::message("User deleted")))
}

/// Flip a user's active flag
async fn toggle_status(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let target = find_user(&state, user_id).await?;
    check_status_toggle(&target)?;

    let now_active = !target.is_active;
    let mut active: user::ActiveModel = target.into();
    active.is_active = Set(now_active);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    let message = if now_active {
        "User activated"
    } else {
        "User deactivated"
    };
    Ok(Json(ApiResponse::with_message(
        message,
        UserResponse::from(updated),
    )))
}
