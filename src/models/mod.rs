pub mod address;
pub mod media;
pub mod menu;
pub mod menu_item;
pub mod page;
pub mod seo_metadata;
pub mod user;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::address::{self, Entity as Address};
    pub use super::media::{self, Entity as Media};
    pub use super::menu::{self, Entity as Menu};
    pub use super::menu_item::{self, Entity as MenuItem};
    pub use super::page::{self, Entity as Page};
    pub use super::seo_metadata::{self, Entity as SeoMetadata};
    pub use super::user::{self, Entity as User};
}
