pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_pages;
mod m20250301_000003_create_seo_metadata;
mod m20250301_000004_create_media;
mod m20250301_000005_create_menus;
mod m20250301_000006_create_menu_items;
mod m20250301_000007_create_addresses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_pages::Migration),
            Box::new(m20250301_000003_create_seo_metadata::Migration),
            Box::new(m20250301_000004_create_media::Migration),
            Box::new(m20250301_000005_create_menus::Migration),
            Box::new(m20250301_000006_create_menu_items::Migration),
            Box::new(m20250301_000007_create_addresses::Migration),
        ]
    }
}
