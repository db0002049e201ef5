use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{AdminOrAbove, Authorized};
use crate::models::page::{self, PageStatus};
use crate::models::prelude::*;
use crate::models::seo_metadata;
use crate::schemas::{ApiResponse, CreatePage, PageQuery, PageResponse, SeoInput, UpdatePage};
use crate::state::AppState;

/// Create public page routes (reads)
pub fn public_pages_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_pages))
        .route("/{page_id}", get(get_page))
        .route("/slug/{slug}", get(get_page_by_slug))
        .with_state(state)
}

/// Create protected page routes (mutations), admin access only
pub fn pages_routes(state: AppState) -> Router {
    Router::new()
        .route("/", axum::routing::post(create_page))
        .route(
            "/{page_id}",
            axum::routing::put(update_page).delete(delete_page),
        )
        .with_state(state)
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn find_page(state: &AppState, page_id: i64) -> Result<page::Model> {
    Page::find_by_id(page_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Page not found".to_string()))
}

/// Check whether another page already uses the slug
async fn slug_taken(state: &AppState, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
    let mut query = Page::find().filter(page::Column::Slug.eq(slug));
    if let Some(id) = exclude_id {
        query = query.filter(page::Column::Id.ne(id));
    }
    Ok(query.one(&state.db).await?.is_some())
}

/// Build the full response for a single page
async fn page_response(state: &AppState, found_page: page::Model) -> Result<PageResponse> {
    let author = User::find_by_id(found_page.author_id).one(&state.db).await?;
    let seo = found_page
        .find_related(SeoMetadata)
        .one(&state.db)
        .await?;
    Ok(PageResponse::from_page(found_page, author, seo))
}

fn seo_active_model(page_id: i64, seo: SeoInput, now: chrono::DateTime<Utc>) -> seo_metadata::ActiveModel {
    seo_metadata::ActiveModel {
        page_id: Set(page_id),
        meta_title: Set(seo.meta_title),
        meta_description: Set(seo.meta_description),
        og_title: Set(seo.og_title),
        og_description: Set(seo.og_description),
        og_image: Set(seo.og_image),
        twitter_card: Set(seo.twitter_card),
        canonical_url: Set(seo.canonical_url),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List pages with optional status and search filters
async fn list_pages(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<PageResponse>>>> {
    let mut query = Page::find();
    if let Some(status) = params.status {
        query = query.filter(page::Column::Status.eq(status));
    }
    if let Some(search) = params.search.filter(|s| !s.is_empty()) {
        query = query.filter(
            page::Column::Title
                .contains(&search)
                .or(page::Column::Content.contains(&search)),
        );
    }

    let pages_with_authors = query
        .find_also_related(User)
        .order_by_desc(page::Column::CreatedAt)
        .all(&state.db)
        .await?;

    // Fetch SEO rows for the whole result set in one query
    let page_ids: Vec<i64> = pages_with_authors.iter().map(|(p, _)| p.id).collect();
    let mut seo_by_page: HashMap<i64, seo_metadata::Model> = SeoMetadata::find()
        .filter(seo_metadata::Column::PageId.is_in(page_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|seo| (seo.page_id, seo))
        .collect();

    let responses = pages_with_authors
        .into_iter()
        .map(|(found_page, author)| {
            let seo = seo_by_page.remove(&found_page.id);
            PageResponse::from_page(found_page, author, seo)
        })
        .collect();

    Ok(Json(ApiResponse::data(responses)))
}

/// Get a page by ID
async fn get_page(
    State(state): State<AppState>,
    Path(page_id): Path<i64>,
) -> Result<Json<ApiResponse<PageResponse>>> {
    let found_page = find_page(&state, page_id).await?;
    Ok(Json(ApiResponse::data(
        page_response(&state, found_page).await?,
    )))
}

/// Get a page by slug
async fn get_page_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PageResponse>>> {
    let found_page = Page::find()
        .filter(page::Column::Slug.eq(&slug))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Page not found".to_string()))?;
    Ok(Json(ApiResponse::data(
        page_response(&state, found_page).await?,
    )))
}

/// Create a page, optionally with SEO metadata
async fn create_page(
    Authorized(actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Json(payload): Json<CreatePage>,
) -> Result<Response> {
    payload.validate()?;

    if slug_taken(&state, &payload.slug, None).await? {
        return Err(AppError::Conflict(
            "A page with this slug already exists".to_string(),
        ));
    }

    let now = Utc::now();

    // Pages created as PUBLISHED get their publish timestamp immediately
    let published_at = match payload.published_at {
        Some(explicit) => Some(explicit),
        None if payload.status == PageStatus::Published => Some(now),
        None => None,
    };

    // Page and SEO row are written together
    let txn = state.db.begin().await?;
    let new_page = page::ActiveModel {
        title: Set(payload.title),
        slug: Set(payload.slug),
        content: Set(payload.content),
        excerpt: Set(payload.excerpt),
        status: Set(payload.status),
        published_at: Set(published_at),
        author_id: Set(actor.id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_page.insert(&txn).await?;

    if let Some(seo) = payload.seo {
        seo_active_model(created.id, seo, now).insert(&txn).await?;
    }
    txn.commit().await?;

    let data = page_response(&state, created).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Page created", data)),
    )
        .into_response())
}

/// Update a page; stamps the publish timestamp on the first transition
/// to PUBLISHED unless the request sets one explicitly
async fn update_page(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(page_id): Path<i64>,
    Json(payload): Json<UpdatePage>,
) -> Result<Json<ApiResponse<PageResponse>>> {
    payload.validate()?;

    let target = find_page(&state, page_id).await?;

    if let Some(ref slug) = payload.slug {
        if slug != &target.slug && slug_taken(&state, slug, Some(page_id)).await? {
            return Err(AppError::Conflict(
                "A page with this slug already exists".to_string(),
            ));
        }
    }

    let now = Utc::now();
    let becomes_published = payload.status == Some(PageStatus::Published)
        && target.status != PageStatus::Published;
    let stamp = match payload.published_at {
        // An explicit timestamp always wins
        Some(explicit) => Some(Some(explicit)),
        None if becomes_published && target.published_at.is_none() => Some(Some(now)),
        None => None,
    };

    let txn = state.db.begin().await?;
    let mut active: page::ActiveModel = target.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(slug) = payload.slug {
        active.slug = Set(slug);
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(excerpt) = payload.excerpt {
        active.excerpt = Set(Some(excerpt));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(published_at) = stamp {
        active.published_at = Set(published_at);
    }
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    if let Some(seo) = payload.seo {
        // Replace the SEO record wholesale
        let existing = SeoMetadata::find()
            .filter(seo_metadata::Column::PageId.eq(page_id))
            .one(&txn)
            .await?;
        match existing {
            Some(record) => {
                let mut seo_active: seo_metadata::ActiveModel = record.into();
                seo_active.meta_title = Set(seo.meta_title);
                seo_active.meta_description = Set(seo.meta_description);
                seo_active.og_title = Set(seo.og_title);
                seo_active.og_description = Set(seo.og_description);
                seo_active.og_image = Set(seo.og_image);
                seo_active.twitter_card = Set(seo.twitter_card);
                seo_active.canonical_url = Set(seo.canonical_url);
                seo_active.updated_at = Set(now);
                seo_active.update(&txn).await?;
            }
            None => {
                seo_active_model(page_id, seo, now).insert(&txn).await?;
            }
        }
    }
    txn.commit().await?;

    let data = page_response(&state, updated).await?;
    Ok(Json(ApiResponse::with_message("Page updated", data)))
}

/// Delete a page and its SEO metadata
async fn delete_page(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(page_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let target = find_page(&state, page_id).await?;
    // SEO row goes with it via the FK cascade
    target.delete(&state.db).await?;
    Ok(Json(ApiResponse::message("Page deleted")))
}
