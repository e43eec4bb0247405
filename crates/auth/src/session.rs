//! Session state: the single source of truth for who is logged in.
//!
//! The store is injected into consumers (cloned handles share one state). All
//! writes go through [`SessionStore::set_credentials`] and [`SessionStore::clear`];
//! each write replaces the whole session in one step, so readers never observe a
//! half-applied login or logout.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{AccessToken, Identity, Role};

/// An authenticated session: identity and token are present together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: Identity,
    access_token: AccessToken,
}

impl Session {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}

/// Shared, observable session store.
///
/// Cheap to clone; clones refer to the same session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<Option<Session>>>,
}

impl SessionStore {
    /// A store with nobody logged in.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { state: Arc::new(tx) }
    }

    /// Install a freshly authenticated session, replacing any previous one.
    pub fn set_credentials(&self, identity: Identity, access_token: AccessToken) {
        tracing::info!(
            admin_id = %identity.id(),
            role = %identity.role(),
            "session established"
        );
        self.state.send_replace(Some(Session {
            identity,
            access_token,
        }));
    }

    /// Drop the current session. Returns the identity that was logged in, if any.
    pub fn clear(&self) -> Option<Identity> {
        let previous = self.state.send_replace(None).map(|s| s.identity);
        if let Some(identity) = &previous {
            tracing::info!(admin_id = %identity.id(), "session cleared");
        }
        previous
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().as_ref().map(|s| s.identity.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().as_ref().map(|s| s.identity.role())
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.state.borrow().as_ref().map(|s| s.access_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Observe session changes (login, logout).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civicdesk_core::AdminId;

    fn admin() -> Identity {
        Identity::new(AdminId::new(), "admin@citizen.gov", Role::Admin).unwrap()
    }

    #[test]
    fn starts_unauthenticated() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        assert_eq!(store.identity(), None);
        assert_eq!(store.role(), None);
        assert!(store.access_token().is_none());
    }

    #[test]
    fn set_and_clear_are_all_or_nothing() {
        let store = SessionStore::new();
        let identity = admin();
        store.set_credentials(identity.clone(), AccessToken::new("t-1"));

        assert!(store.is_authenticated());
        assert_eq!(store.identity(), Some(identity.clone()));
        assert_eq!(store.role(), Some(Role::Admin));
        assert_eq!(store.access_token().unwrap().expose(), "t-1");

        assert_eq!(store.clear(), Some(identity));
        assert!(!store.is_authenticated());
        assert!(store.access_token().is_none());
        assert_eq!(store.clear(), None);
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        store.set_credentials(admin(), AccessToken::new("t"));
        assert!(other.is_authenticated());
    }

    #[tokio::test]
    async fn subscribers_see_logout() {
        let store = SessionStore::new();
        store.set_credentials(admin(), AccessToken::new("t"));
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.clear();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
