pub mod auth;
pub mod policy;
pub mod security_headers;

pub use auth::{require_auth, AuthenticatedUser};
pub use policy::{
    Authenticated, Authorized, AdminOrAbove, AnyRole, EditorOrAbove, SalesOrAbove,
};
pub use security_headers::security_headers;
