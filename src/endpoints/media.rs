use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use validator::Validate;

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::middleware::{AdminOrAbove, AnyRole, Authorized};
use crate::models::media;
use crate::models::prelude::*;
use crate::schemas::{ApiResponse, MediaQuery, MediaResponse, UpdateMedia};
use crate::services::MediaStorage;
use crate::state::AppState;

/// Create media library routes
///
/// Reads require any active account, mutations require admin access. The
/// body limit covers the multipart upload.
pub fn media_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_media))
        .route("/upload", post(upload_media))
        .route(
            "/{media_id}",
            get(get_media).put(update_media).delete(delete_media),
        )
        .layer(DefaultBodyLimit::max(CONFIG.uploads.max_upload_bytes))
        .with_state(state)
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn find_media(state: &AppState, media_id: i64) -> Result<media::Model> {
    Media::find_by_id(media_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))
}

async fn media_response(state: &AppState, found_media: media::Model) -> Result<MediaResponse> {
    let uploader = User::find_by_id(found_media.uploaded_by_id)
        .one(&state.db)
        .await?;
    Ok(MediaResponse::from_media(found_media, uploader))
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List media with optional mime type and search filters
async fn list_media(
    Authorized(_actor, ..): Authorized<AnyRole>,
    State(state): State<AppState>,
    Query(params): Query<MediaQuery>,
) -> Result<Json<ApiResponse<Vec<MediaResponse>>>> {
    let mut query = Media::find();
    if let Some(kind) = params.kind.filter(|k| !k.is_empty()) {
        query = query.filter(media::Column::MimeType.starts_with(&kind));
    }
    if let Some(search) = params.search.filter(|s| !s.is_empty()) {
        query = query.filter(media::Column::OriginalName.contains(&search));
    }

    let items = query
        .find_also_related(User)
        .order_by_desc(media::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::data(
        items
            .into_iter()
            .map(|(found_media, uploader)| MediaResponse::from_media(found_media, uploader))
            .collect(),
    )))
}

/// Get a media item by ID
async fn get_media(
    Authorized(_actor, ..): Authorized<AnyRole>,
    State(state): State<AppState>,
    Path(media_id): Path<i64>,
) -> Result<Json<ApiResponse<MediaResponse>>> {
    let found_media = find_media(&state, media_id).await?;
    Ok(Json(ApiResponse::data(
        media_response(&state, found_media).await?,
    )))
}

/// Upload a file via multipart form data
///
/// Expects the file under the `file` field; `alt` and `caption` are
/// optional text fields.
async fn upload_media(
    Authorized(actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut alt: Option<String> = None;
    let mut caption: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;
                file = Some((original_name, mime_type, data.to_vec()));
            }
            Some("alt") => alt = Some(field.text().await?),
            Some("caption") => caption = Some(field.text().await?),
            _ => {}
        }
    }

    let (original_name, mime_type, data) =
        file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    // Same length limits as the metadata update
    UpdateMedia {
        alt: alt.clone(),
        caption: caption.clone(),
    }
    .validate()?;

    let filename = MediaStorage::generate_filename(&original_name);
    let path = state.storage.save(&filename, &data).await?;
    let url = state.storage.url_of(&filename);
    let now = Utc::now();

    let new_media = media::ActiveModel {
        filename: Set(filename.clone()),
        original_name: Set(original_name),
        mime_type: Set(mime_type),
        size: Set(data.len() as i64),
        path: Set(path.to_string_lossy().into_owned()),
        url: Set(url),
        alt: Set(alt),
        caption: Set(caption),
        uploaded_by_id: Set(actor.id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = match new_media.insert(&state.db).await {
        Ok(created) => created,
        Err(e) => {
            // Do not leave the file behind when the row insert fails
            if let Err(cleanup) = state.storage.remove(&filename).await {
                tracing::warn!("failed to remove orphaned upload {}: {}", filename, cleanup);
            }
            return Err(e.into());
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "File uploaded",
            MediaResponse::from_media(created, Some(actor)),
        )),
    )
        .into_response())
}

/// Update a media item's alt text and caption
async fn update_media(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(media_id): Path<i64>,
    Json(payload): Json<UpdateMedia>,
) -> Result<Json<ApiResponse<MediaResponse>>> {
    payload.validate()?;

    let target = find_media(&state, media_id).await?;
    let mut active: media::ActiveModel = target.into();
    if let Some(alt) = payload.alt {
        active.alt = Set(Some(alt));
    }
    if let Some(caption) = payload.caption {
        active.caption = Set(Some(caption));
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    Ok(Json(ApiResponse::with_message(
        "Media updated",
        media_response(&state, updated).await?,
    )))
}

/// Delete a media item and its stored file
async fn delete_media(
    Authorized(_actor, ..): Authorized<AdminOrAbove>,
    State(state): State<AppState>,
    Path(media_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let target = find_media(&state, media_id).await?;

    // The row is the source of truth; a failed file removal is only logged
    if let Err(e) = state.storage.remove(&target.filename).await {
        tracing::warn!("failed to remove stored file {}: {}", target.filename, e);
    }
    target.delete(&state.db).await?;

    Ok(Json(ApiResponse::message("Media deleted")))
}
