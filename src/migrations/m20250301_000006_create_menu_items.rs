//! Migration: Create menu_items table (self-referencing tree per menu)

use sea_orm_migration::prelude::*;

use super::m20250301_000005_create_menus::Menus;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuItems::Label).string().not_null())
                    .col(ColumnDef::new(MenuItems::Url).string().not_null())
                    .col(
                        ColumnDef::new(MenuItems::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MenuItems::ParentId).big_integer().null())
                    .col(ColumnDef::new(MenuItems::MenuId).big_integer().not_null())
                    .col(
                        ColumnDef::new(MenuItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MenuItems::Table, MenuItems::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MenuItems::Table, MenuItems::ParentId)
                            .to(MenuItems::Table, MenuItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_items_menu_id")
                    .table(MenuItems::Table)
                    .col(MenuItems::MenuId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_items_parent_id")
                    .table(MenuItems::Table)
                    .col(MenuItems::ParentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuItems::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MenuItems {
    Table,
    Id,
    Label,
    Url,
    #[iden = "sort_order"]
    SortOrder,
    #[iden = "parent_id"]
    ParentId,
    #[iden = "menu_id"]
    MenuId,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
