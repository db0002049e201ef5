//! Migration: Create seo_metadata table (1:1 with pages)

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_pages::Pages;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SeoMetadata::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeoMetadata::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SeoMetadata::PageId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SeoMetadata::MetaTitle).string().null())
                    .col(ColumnDef::new(SeoMetadata::MetaDescription).text().null())
                    .col(ColumnDef::new(SeoMetadata::OgTitle).string().null())
                    .col(ColumnDef::new(SeoMetadata::OgDescription).text().null())
                    .col(ColumnDef::new(SeoMetadata::OgImage).string().null())
                    .col(ColumnDef::new(SeoMetadata::TwitterCard).string().null())
                    .col(ColumnDef::new(SeoMetadata::CanonicalUrl).string().null())
                    .col(
                        ColumnDef::new(SeoMetadata::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeoMetadata::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SeoMetadata::Table, SeoMetadata::PageId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(SeoMetadata::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum SeoMetadata {
    Table,
    Id,
    #[iden = "page_id"]
    PageId,
    #[iden = "meta_title"]
    MetaTitle,
    #[iden = "meta_description"]
    MetaDescription,
    #[iden = "og_title"]
    OgTitle,
    #[iden = "og_description"]
    OgDescription,
    #[iden = "og_image"]
    OgImage,
    #[iden = "twitter_card"]
    TwitterCard,
    #[iden = "canonical_url"]
    CanonicalUrl,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
