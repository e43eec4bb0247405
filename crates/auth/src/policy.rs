//! Role policy: pure membership checks.

use thiserror::Error;

use crate::{Identity, Role, RoleSet};

/// Why a check failed. Used for logging and redirect reasons, never shown as an
/// error page.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("role '{0}' is not permitted here")]
    RoleNotPermitted(Role),
}

/// Is `role` admitted by `allowed`?
///
/// - No IO
/// - No panics
/// - Absent role (unauthenticated) is always denied
/// - An empty `allowed` set denies everyone
pub fn is_allowed(role: Option<Role>, allowed: RoleSet) -> bool {
    match role {
        Some(role) => allowed.contains(role),
        None => false,
    }
}

/// Same decision as [`is_allowed`], but reports which precondition failed.
pub fn authorize(identity: Option<&Identity>, allowed: RoleSet) -> Result<(), AuthzError> {
    let identity = identity.ok_or(AuthzError::Unauthenticated)?;
    if is_allowed(Some(identity.role()), allowed) {
        Ok(())
    } else {
        Err(AuthzError::RoleNotPermitted(identity.role()))
    }
}
