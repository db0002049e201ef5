use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{AnyRole, Authorized};
use crate::models::address;
use crate::models::prelude::*;
use crate::schemas::{AddressResponse, ApiResponse, CreateAddress, UpdateAddress};
use crate::state::AppState;

/// Create address routes, strictly scoped to the calling user
pub fn addresses_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_addresses).post(create_address))
        .route(
            "/{address_id}",
            get(get_address).put(update_address).delete(delete_address),
        )
        .route("/{address_id}/set-default", patch(set_default_address))
        .with_state(state)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Look up an address only within the caller's own addresses
async fn find_owned_address(
    state: &AppState,
    address_id: i64,
    user_id: i64,
) -> Result<address::Model> {
    Address::find()
        .filter(address::Column::Id.eq(address_id))
        .filter(address::Column::UserId.eq(user_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Address not found".to_string()))
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List the caller's addresses, default first
async fn list_addresses(
    Authorized(actor, ..): Authorized<AnyRole>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AddressResponse>>>> {
    let addresses = Address::find()
        .filter(address::Column::UserId.eq(actor.id))
        .order_by_desc(address::Column::IsDefault)
        .order_by_desc(address::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::data(
        addresses.into_iter().map(AddressResponse::from).collect(),
    )))
}

/// Get one of the caller's addresses by ID
async fn get_address(
    Authorized(actor, ..): Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(address_id): Path<i64>,
) -> Result<Json<ApiResponse<AddressResponse>>> {
    let found = find_owned_address(&state, address_id, actor.id).await?;
    Ok(Json(ApiResponse::data(AddressResponse::from(found))))
}

/// Create an address; marking it default clears the flag on all others
async fn create_address(
    Authorized(actor, ..): Authorized<AnyRole>,
    State(state): State<AppState>,
    Json(payload): Json<CreateAddress>,
) -> Result<Response> {
    payload.validate()?;

    let now = Utc::now();

    // Clearing the old default and inserting the new address is atomic
    let txn = state.db.begin().await?;
    if payload.is_default {
        Address::update_many()
            .col_expr(address::Column::IsDefault, Expr::value(false))
            .filter(address::Column::UserId.eq(actor.id))
            .exec(&txn)
            .await?;
    }

    let new_address = address::ActiveModel {
        user_id: Set(actor.id),
        label: Set(payload.label),
        full_name: Set(payload.full_name),
        phone: Set(payload.phone),
        street: Set(payload.street),
        city: Set(payload.city),
        state: Set(payload.state),
        zip_code: Set(payload.zip_code),
        country: Set(payload.country),
        is_default: Set(payload.is_default),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_address.insert(&txn).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Address created",
            AddressResponse::from(created),
        )),
    )
        .into_response())
}

/// Replace an address; marking it default clears the flag on all others
async fn update_address(
    Authorized(actor, ..): Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(address_id): Path<i64>,
    Json(payload): Json<UpdateAddress>,
) -> Result<Json<ApiResponse<AddressResponse>>> {
    payload.validate()?;

    let target = find_owned_address(&state, address_id, actor.id).await?;

    let txn = state.db.begin().await?;
    if payload.is_default {
        Address::update_many()
            .col_expr(address::Column::IsDefault, Expr::value(false))
            .filter(address::Column::UserId.eq(actor.id))
            .filter(address::Column::Id.ne(address_id))
            .exec(&txn)
            .await?;
    }

    let mut active: address::ActiveModel = target.into();
    active.label = Set(payload.label);
    active.full_name = Set(payload.full_name);
    active.phone = Set(payload.phone);
    active.street = Set(payload.street);
    active.city = Set(payload.city);
    active.state = Set(payload.state);
    active.zip_code = Set(payload.zip_code);
    active.country = Set(payload.country);
    active.is_default = Set(payload.is_default);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(ApiResponse::with_message(
        "Address updated",
        AddressResponse::from(updated),
    )))
}

/// Delete one of the caller's addresses
async fn delete_address(
    Authorized(actor, ..): Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(address_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let target = find_owned_address(&state, address_id, actor.id).await?;
    target.delete(&state.db).await?;
    Ok(Json(ApiResponse::message("Address deleted")))
}

/// Make an address the caller's default
async fn set_default_address(
    Authorized(actor, ..): Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(address_id): Path<i64>,
) -> Result<Json<ApiResponse<AddressResponse>>> {
    let target = find_owned_address(&state, address_id, actor.id).await?;

    let txn = state.db.begin().await?;
    Address::update_many()
        .col_expr(address::Column::IsDefault, Expr::value(false))
        .filter(address::Column::UserId.eq(actor.id))
        .exec(&txn)
        .await?;

    let mut active: address::ActiveModel = target.into();
    active.is_default = Set(true);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(ApiResponse::with_message(
        "Default address set",
        AddressResponse::from(updated),
    )))
}
