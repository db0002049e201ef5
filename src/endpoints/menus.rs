use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{AdminOrAbove, Authorized};
use crate::models::prelude::*;
use crate::models::{menu, menu_item};
use crate::schemas::{
    ApiResponse, CreateMenu, CreateMenuItem, MenuItemResponse, MenuResponse, UpdateMenu,
    UpdateMenuItem,
};
use crate::state::AppState;

/// Create public menu routes (reads)
pub fn public_menus_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_menus))
        .route("/{menu_id}", get(get_menu))
        .route("/location/{location}", get(get_menu_by_location))
        .with_state(state)
}

/// Create protected menu routes (mutations), admin access only
pub fn menus_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_menu))
        .route("/{menu_id}", put(update_menu).delete(delete_menu))
        .with_state(state)
}

/// Create menu item routes, admin access only
pub fn menu_items_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_menu_item))
        .route("/{item_id}", put(update_menu_item).delete(delete_menu_item))
        .with_state(state)
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn find_menu(state: &AppState, menu_id: i64) -> Result<menu::Model> {
    Menu::find_by_id(menu_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu not found".to_string()))
}

async fn find_menu_item(state: &AppState, item_id: i64) -> Result<menu_item::Model> {
    MenuItem::find_by_id(item_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))
}

/// Check whether another menu already uses the name
async fn menu_name_taken(state: &AppState, name: &str, exclude_id: Option<i64>) -> Result<bool> {
    let mut query = Menu::find().filter(menu::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(menu::Column::Id.ne(id));
    }
    Ok(query.one(&state.db).await?.is_some())
}

/// Load a menu's items and build the nested response
async fn menu_response(state: &AppState, found_menu: menu::Model) -> Result<MenuResponse> {
    let items = found_menu.find_related(MenuItem).all(&state.db).await?;
    Ok(MenuResponse::from_menu(found_menu, items))
}

// ============================================================================
// Menu Endpoint Handlers
// ============================================================================

/// List all menus with their nested item trees
async fn list_menus(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<MenuResponse>>>> {
    let menus = Menu::find()
        .order_by_asc(menu::Column::Name)
        .all(&state.db)
        .await?;

    let mut items_by_menu: HashMap<i64, Vec<menu_item::Model>> = HashMap::new();
    for item in MenuItem::find().all(&state.db).await? {
        items_by_menu.entry(item.menu_id).or_default().push(item);
    }

    let responses = menus
        .into_iter()
        .map(|found_menu| {
            let items = items_by_menu.remove(&found_menu.id).unwrap_or_default();
            MenuResponse::from_menu(found_menu, items)
        })
        .collect();

    Ok(Json(ApiResponse::data(responses)))
}

/// Get a menu by ID
async fn get_menu(
    State(state): State<AppState>,
    Path(menu_id): Path<i64>,
) -> Result<Json<ApiResponse<MenuResponse>>> {
    let found_menu = find_menu(&state, menu_id).await?;
    Ok(Json(ApiResponse::data(
        menu_response(&state, found_menu).await?,
    )))
}

/// Get the first menu assigned to a location
async fn get_menu_by_location(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<ApiResponse<MenuResponse>>> {
    let found_menu = Menu::find()
        .filter(menu::Column::Location.eq(&location))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu not found".to_string()))?;
    Ok(Json(ApiResponse::data(
        menu_response(&state, found_menu).await?,
    )))
}

/// Create a menu
async fn create_menu(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Json(payload): Json<CreateMenu>,
) -> Result<Response> {
    payload.validate()?;

    if menu_name_taken(&state, &payload.name, None).await? {
        return Err(AppError::Conflict(
            "A menu with this name already exists".to_string(),
        ));
    }

    let now = Utc::now();
    let new_menu = menu::ActiveModel {
        name: Set(payload.name),
        location: Set(payload.location),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_menu.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Menu created",
            MenuResponse::from_menu(created, Vec::new()),
        )),
    )
        .into_response())
}

/// Update a menu's name and location
async fn update_menu(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(menu_id): Path<i64>,
    Json(payload): Json<UpdateMenu>,
) -> Result<Json<ApiResponse<MenuResponse>>> {
    payload.validate()?;

    let target = find_menu(&state, menu_id).await?;

    if let Some(ref name) = payload.name {
        if name != &target.name && menu_name_taken(&state, name, Some(menu_id)).await? {
            return Err(AppError::Conflict(
                "A menu with this name already exists".to_string(),
            ));
        }
    }

    let mut active: menu::ActiveModel = target.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(location) = payload.location {
        active.location = Set(location);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(ApiResponse::with_message(
        "Menu updated",
        menu_response(&state, updated).await?,
    )))
}

/// Delete a menu and all of its items
async fn delete_menu(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(menu_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let target = find_menu(&state, menu_id).await?;
    // Items go with it via the FK cascade
    target.delete(&state.db).await?;
    Ok(Json(ApiResponse::message("Menu deleted")))
}

// ============================================================================
// Menu Item Endpoint Handlers
// ============================================================================

/// Create a menu item, optionally nested under a parent item
async fn create_menu_item(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItem>,
) -> Result<Response> {
    payload.validate()?;

    // Both the menu and the parent item must exist
    find_menu(&state, payload.menu_id).await?;
    if let Some(parent_id) = payload.parent_id {
        MenuItem::find_by_id(parent_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Parent item not found".to_string()))?;
    }

    let now = Utc::now();
    let new_item = menu_item::ActiveModel {
        label: Set(payload.label),
        url: Set(payload.url),
        sort_order: Set(payload.order),
        parent_id: Set(payload.parent_id),
        menu_id: Set(payload.menu_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_item.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Menu item created",
            MenuItemResponse::from(created),
        )),
    )
        .into_response())
}

/// Update a menu item; `parentId: null` detaches it from its parent
async fn update_menu_item(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(payload): Json<UpdateMenuItem>,
) -> Result<Json<ApiResponse<MenuItemResponse>>> {
    payload.validate()?;

    let target = find_menu_item(&state, item_id).await?;

    if let Some(Some(parent_id)) = payload.parent_id {
        MenuItem::find_by_id(parent_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Parent item not found".to_string()))?;
    }

    let mut active: menu_item::ActiveModel = target.into();
    if let Some(label) = payload.label {
        active.label = Set(label);
    }
    if let Some(url) = payload.url {
        active.url = Set(url);
    }
    if let Some(order) = payload.order {
        active.sort_order = Set(order);
    }
    if let Some(parent_id) = payload.parent_id {
        active.parent_id = Set(parent_id);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(ApiResponse::with_message(
        "Menu item updated",
        MenuItemResponse::from(updated),
    )))
}

/// Delete a menu item
async fn delete_menu_item(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let target = find_menu_item(&state, item_id).await?;
    target.delete(&state.db).await?;
    Ok(Json(ApiResponse::message("Menu item deleted")))
}
