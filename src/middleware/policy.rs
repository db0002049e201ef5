//! Role policy layer with type-safe guard extractors
//!
//! The auth middleware only proves identity; everything here decides what
//! that identity may do. Guards run two checks in order: the account must be
//! active, then the role must satisfy the guard. Handlers pick their guard
//! through the `Authorized<G>` extractor:
//!
//! ```ignore
//! use crate::middleware::{Authorized, policy::AdminOrAbove};
//!
//! async fn create_page(
//!     Authorized(actor, ..): Authorized<AdminOrAbove>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<PageResponse>> {
//!     // actor is active and ADMIN or SUPER_ADMIN
//! }
//! ```
//!
//! The user-management exceptions (super admin protections, self-delete) are
//! plain rule functions so the handlers and tests can exercise them directly.

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::user::{self, Role};

/// Trait for role guard marker types
pub trait RoleGuard: Send + Sync + 'static {
    /// Human-readable requirement, used in denial messages
    const DESCRIPTION: &'static str;

    fn allows(role: Role) -> bool;
}

/// Macro to define role guard types
///
/// Creates zero-sized marker types that implement `RoleGuard`
macro_rules! define_role_guards {
    ($($(#[$meta:meta])* $name:ident => $desc:expr, $allows:expr),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl RoleGuard for $name {
                const DESCRIPTION: &'static str = $desc;

                fn allows(role: Role) -> bool {
                    $allows(role)
                }
            }
        )*
    };
}

define_role_guards! {
    /// SUPER_ADMIN or ADMIN
    AdminOrAbove => "admin access", Role::is_admin_or_above,
    /// SUPER_ADMIN, ADMIN or EDITOR
    EditorOrAbove => "editor access", Role::is_editor_or_above,
    /// SUPER_ADMIN, ADMIN or SALES
    SalesOrAbove => "sales access", Role::is_sales_or_above,
    /// Any role; the account still has to be active
    AnyRole => "an active account", |_: Role| true,
}

/// Extractor that requires an active account with a role satisfying `G`
///
/// Fails 401 when no authenticated user is present (route missed the auth
/// middleware or the token was rejected), 403 when the account is
/// deactivated or the role is insufficient.
#[derive(Debug, Clone)]
pub struct Authorized<G: RoleGuard>(pub user::Model, pub PhantomData<G>);

impl<G: RoleGuard> Authorized<G> {
    /// Get the authenticated user
    pub fn user(&self) -> &user::Model {
        &self.0
    }

    /// Get the user ID
    pub fn user_id(&self) -> i64 {
        self.0.id
    }
}

impl<S, G> FromRequestParts<S> for Authorized<G>
where
    S: Send + Sync,
    G: RoleGuard,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        // Active check comes before any role check
        if !auth_user.0.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        if !G::allows(auth_user.0.role) {
            return Err(AppError::Forbidden(format!(
                "Insufficient privileges: {} required",
                G::DESCRIPTION
            )));
        }

        Ok(Authorized(auth_user.0.clone(), PhantomData))
    }
}

/// Extractor for any authenticated user, without the active-account check
///
/// Used by the profile endpoints, which stay reachable for deactivated
/// accounts.
#[derive(Debug, Clone)]
pub struct Authenticated(pub user::Model);

impl Authenticated {
    /// Get the authenticated user
    pub fn user(&self) -> &user::Model {
        &self.0
    }

    /// Get the user ID
    pub fn user_id(&self) -> i64 {
        self.0.id
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        Ok(Authenticated(auth_user.0.clone()))
    }
}

// ============================================================================
// User-management rules
// ============================================================================

/// Only a super admin may hand out the SUPER_ADMIN role.
pub fn check_role_assignment(actor: Role, requested: Role) -> crate::error::Result<()> {
    if requested == Role::SuperAdmin && actor != Role::SuperAdmin {
        return Err(AppError::Forbidden(
            "Only a super admin may assign the SUPER_ADMIN role".to_string(),
        ));
    }
    Ok(())
}

/// A super admin can never be demoted; assigning SUPER_ADMIN follows
/// [`check_role_assignment`].
pub fn check_role_change(
    actor: Role,
    target: &user::Model,
    requested: Role,
) -> crate::error::Result<()> {
    if target.role == Role::SuperAdmin && requested != Role::SuperAdmin {
        return Err(AppError::Forbidden(
            "The super admin role cannot be changed".to_string(),
        ));
    }
    check_role_assignment(actor, requested)
}

/// Super admins cannot be deleted, and nobody deletes their own account.
pub fn check_user_delete(actor: &user::Model, target: &user::Model) -> crate::error::Result<()> {
    if target.role == Role::SuperAdmin {
        return Err(AppError::Forbidden(
            "The super admin account cannot be deleted".to_string(),
        ));
    }
    if target.id == actor.id {
        return Err(AppError::Forbidden(
            "You cannot delete your own account".to_string(),
        ));
    }
    Ok(())
}

/// The super admin account can never be deactivated via toggle-status.
pub fn check_status_toggle(target: &user::Model) -> crate::error::Result<()> {
    if target.role == Role::SuperAdmin {
        return Err(AppError::Forbidden(
            "The super admin account cannot be deactivated".to_string(),
        ));
    }
    Ok(())
}
