pub mod address;
pub mod auth;
pub mod media;
pub mod menu;
pub mod page;
pub mod response;
pub mod user;

pub use address::*;
pub use auth::*;
pub use media::*;
pub use menu::*;
pub use page::*;
pub use response::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Deserializes a field that distinguishes "absent" from "explicitly null".
///
/// `None` means the field was not sent, `Some(None)` means it was sent as
/// null. Combine with `#[serde(default)]` on the field.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
