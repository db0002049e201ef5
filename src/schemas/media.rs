use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::media;

use super::user::UserSummary;

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedia {
    #[validate(length(max = 200, message = "Alt text must be at most 200 characters"))]
    pub alt: Option<String>,
    #[validate(length(max = 500, message = "Caption must be at most 500 characters"))]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaQuery {
    /// Mime type prefix, e.g. "image" matches "image/png"
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Substring match over the original file name
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub id: i64,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    pub url: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub uploaded_by_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaResponse {
    pub fn from_media(media: media::Model, uploaded_by: Option<crate::models::user::Model>) -> Self {
        Self {
            id: media.id,
            filename: media.filename,
            original_name: media.original_name,
            mime_type: media.mime_type,
            size: media.size,
            url: media.url,
            alt: media.alt,
            caption: media.caption,
            uploaded_by_id: media.uploaded_by_id,
            uploaded_by: uploaded_by.map(UserSummary::from),
            created_at: media.created_at,
            updated_at: media.updated_at,
        }
    }
}
