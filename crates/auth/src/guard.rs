//! Route guard: decides, per navigation, whether a destination may render.

use serde::Serialize;

use crate::policy::{AuthzError, authorize};
use crate::routes::{Destination, RouteTable};
use crate::{Identity, Role, RoleSet};

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    Unauthenticated,
    RoleNotPermitted(Role),
    UnknownPath,
}

impl From<AuthzError> for RedirectReason {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Unauthenticated => RedirectReason::Unauthenticated,
            AuthzError::RoleNotPermitted(role) => RedirectReason::RoleNotPermitted(role),
        }
    }
}

/// Instruction for the hosting router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    pub reason: RedirectReason,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Redirect(r) => Some(r),
        }
    }

    /// Produce the protected content only when allowed.
    ///
    /// `content` is not invoked on redirect, so nothing protected is built.
    pub fn render<T>(self, content: impl FnOnce() -> T) -> Result<T, Redirect> {
        match self {
            GuardDecision::Allow => Ok(content()),
            GuardDecision::Redirect(r) => Err(r),
        }
    }
}

/// Synchronous navigation gate.
///
/// - Absent identity: redirect to the login entry point.
/// - Identity whose role is not admitted: redirect to the landing location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    login_path: String,
    landing_path: String,
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>, landing_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            landing_path: landing_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    /// Gate a destination that requires one of `required`.
    pub fn check(&self, identity: Option<&Identity>, required: RoleSet) -> GuardDecision {
        match authorize(identity, required) {
            Ok(()) => GuardDecision::Allow,
            Err(AuthzError::Unauthenticated) => self.redirect_to_login(),
            Err(err) => GuardDecision::Redirect(Redirect {
                to: self.landing_path.clone(),
                reason: err.into(),
            }),
        }
    }

    /// Resolve `path` against `table` and gate it.
    ///
    /// Unknown paths send authenticated users to the landing location and
    /// everyone else to login.
    pub fn navigate(
        &self,
        table: &RouteTable,
        path: &str,
        identity: Option<&Identity>,
    ) -> GuardDecision {
        let decision = match table.resolve(path) {
            Destination::Public(_) => GuardDecision::Allow,
            Destination::Protected(item) => self.check(identity, item.allowed),
            Destination::Unknown if identity.is_none() => self.redirect_to_login(),
            Destination::Unknown => GuardDecision::Redirect(Redirect {
                to: self.landing_path.clone(),
                reason: RedirectReason::UnknownPath,
            }),
        };
        if let GuardDecision::Redirect(r) = &decision {
            tracing::debug!(from = path, to = %r.to, reason = ?r.reason, "navigation redirected");
        }
        decision
    }

    fn redirect_to_login(&self) -> GuardDecision {
        GuardDecision::Redirect(Redirect {
            to: self.login_path.clone(),
            reason: RedirectReason::Unauthenticated,
        })
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new("/login", "/")
    }
}
