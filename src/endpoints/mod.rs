pub mod addresses;
pub mod auth;
pub mod media;
pub mod menus;
pub mod pages;
pub mod users;

use axum::{middleware as axum_middleware, Router};

use crate::config::CONFIG;
use crate::middleware::{require_auth, security_headers};
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", axum::routing::get(service_info))
        .route("/api/health", axum::routing::get(health_check))
        .nest("/api/auth", auth::public_auth_routes(state.clone()))
        .nest("/api/cms/pages", pages::public_pages_routes(state.clone()))
        .nest("/api/cms/menus", menus::public_menus_routes(state.clone()));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .nest("/api/auth", auth::profile_routes(state.clone()))
        .nest("/api/users", users::users_routes(state.clone()))
        .nest("/api/cms/pages", pages::pages_routes(state.clone()))
        .nest("/api/cms/media", media::media_routes(state.clone()))
        .nest("/api/cms/menus", menus::menus_routes(state.clone()))
        .nest("/api/cms/menu-items", menus::menu_items_routes(state.clone()))
        .nest("/api/addresses", addresses::addresses_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    // Merge public and protected routes
    public_routes
        .merge(protected_routes)
        .layer(axum_middleware::from_fn(security_headers))
}

/// Service info at the root path
async fn service_info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "sitekit-api",
        "version": CONFIG.version,
        "docs": "/api/health"
    }))
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running"
    }))
}
