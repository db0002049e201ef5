use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::page::{self, PageStatus};
use crate::models::seo_metadata;

use super::user::UserSummary;

/// Slugs are lowercase alphanumeric segments joined by single hyphens
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("slug").with_message(
            "Slug may only contain lowercase letters, digits and single hyphens".into(),
        ))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePage {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: String,
    #[validate(custom(function = validate_slug))]
    pub slug: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub excerpt: Option<String>,
    #[serde(default = "default_status")]
    pub status: PageStatus,
    /// Overrides the automatic publish timestamp when provided
    pub published_at: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub seo: Option<SeoInput>,
}

fn default_status() -> PageStatus {
    PageStatus::Draft
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePage {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: Option<String>,
    #[validate(custom(function = validate_slug))]
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<PageStatus>,
    pub published_at: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub seo: Option<SeoInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeoInput {
    #[validate(length(max = 200, message = "Meta title must be at most 200 characters"))]
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_card: Option<String>,
    pub canonical_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub status: Option<PageStatus>,
    /// Substring match over title and content
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PageStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageResponse {
    pub fn from_page(
        page: page::Model,
        author: Option<crate::models::user::Model>,
        seo: Option<seo_metadata::Model>,
    ) -> Self {
        Self {
            id: page.id,
            title: page.title,
            slug: page.slug,
            content: page.content,
            excerpt: page.excerpt,
            status: page.status,
            published_at: page.published_at,
            author_id: page.author_id,
            author: author.map(UserSummary::from),
            seo: seo.map(SeoResponse::from),
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeoResponse {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_card: Option<String>,
    pub canonical_url: Option<String>,
}

impl From<seo_metadata::Model> for SeoResponse {
    fn from(seo: seo_metadata::Model) -> Self {
        Self {
            meta_title: seo.meta_title,
            meta_description: seo.meta_description,
            og_title: seo.og_title,
            og_description: seo.og_description,
            og_image: seo.og_image,
            twitter_card: seo.twitter_card,
            canonical_url: seo.canonical_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        for slug in ["about", "about-us", "page-2024", "a", "1-2-3"] {
            assert!(validate_slug(slug).is_ok(), "{slug} should be valid");
        }
    }

    #[test]
    fn test_invalid_slugs() {
        for slug in [
            "",
            "-leading",
            "trailing-",
            "double--hyphen",
            "Upper",
            "with space",
            "under_score",
            "ümlaut",
        ] {
            assert!(validate_slug(slug).is_err(), "{slug:?} should be rejected");
        }
    }
}
