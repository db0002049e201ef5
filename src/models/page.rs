use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Editorial lifecycle of a page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PageStatus {
    #[sea_orm(string_value = "DRAFT")]
    #[serde(rename = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "PUBLISHED")]
    #[serde(rename = "PUBLISHED")]
    Published,
    #[sea_orm(string_value = "ARCHIVED")]
    #[serde(rename = "ARCHIVED")]
    Archived,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    pub status: PageStatus,
    /// Stamped on the first transition to PUBLISHED unless set explicitly.
    pub published_at: Option<DateTimeUtc>,
    pub author_id: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(has_one = "super::seo_metadata::Entity")]
    SeoMetadata,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::seo_metadata::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeoMetadata.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
