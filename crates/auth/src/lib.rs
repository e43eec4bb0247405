//! `civicdesk-auth`: role-based access for the admin console.
//!
//! Pure policy plus the session store. No rendering and no transport.

pub mod guard;
pub mod identity;
pub mod policy;
pub mod roles;
pub mod routes;
pub mod session;

pub use guard::{GuardDecision, Redirect, RedirectReason, RouteGuard};
pub use identity::{AccessToken, Identity};
pub use policy::{AuthzError, authorize, is_allowed};
pub use roles::{Role, RoleSet};
pub use routes::{Capabilities, Destination, NAVIGATION, NavItem, RouteTable};
pub use session::{Session, SessionStore};
