//! The console shell: wires session, guard, coordinators and the host router.
//!
//! Control flow for a guarded action (logout):
//!
//! ```text
//! user action -> ConfirmCoordinator -> SessionStore::clear -> RouteGuard redirect -> Notifier
//! ```

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use civicdesk_auth::{
    AccessToken, Capabilities, GuardDecision, Identity, Redirect, RedirectReason, RouteGuard,
    RouteTable, SessionStore,
};

use crate::config::ConsoleConfig;
use crate::confirm::{ConfirmCoordinator, ConfirmError, ConfirmOptions};
use crate::fallback::{FallbackView, render_or_fallback};
use crate::fetch::fetch_or_report;
use crate::notify::Notifier;
use crate::scroll::ScrollLock;

/// Host router hook: the shell only ever asks it to go somewhere else.
pub trait Navigator: Send + Sync {
    fn redirect(&self, to: &str);
}

/// Navigator for headless hosts: remembers every redirect.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for HistoryNavigator {
    fn redirect(&self, to: &str) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(to.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LogoutOutcome {
    /// The user backed out; nothing changed.
    Cancelled,
    /// Session cleared; `redirect` is where the user was sent.
    LoggedOut { redirect: Redirect },
    /// Another logout is still running.
    AlreadyInProgress,
}

/// Resets the in-progress flag on every exit path.
struct InProgress<'a>(&'a AtomicBool);

impl<'a> InProgress<'a> {
    fn enter(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Shared application context handed to every screen.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Console {
    session: SessionStore,
    table: Arc<RouteTable>,
    guard: Arc<RouteGuard>,
    confirm: ConfirmCoordinator,
    notifier: Notifier,
    navigator: Arc<dyn Navigator>,
    location: Arc<Mutex<String>>,
    logging_out: Arc<AtomicBool>,
}

impl Console {
    pub fn new(
        config: &ConsoleConfig,
        navigator: Arc<dyn Navigator>,
        scroll: Arc<dyn ScrollLock>,
    ) -> Self {
        Self {
            session: SessionStore::new(),
            table: Arc::new(RouteTable::console()),
            guard: Arc::new(config.route_guard()),
            confirm: ConfirmCoordinator::new(scroll),
            notifier: Notifier::new(config.notification_timings()),
            navigator,
            location: Arc::new(Mutex::new(config.landing_path.clone())),
            logging_out: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn confirmations(&self) -> &ConfirmCoordinator {
        &self.confirm
    }

    pub fn notifications(&self) -> &Notifier {
        &self.notifier
    }

    pub fn location(&self) -> String {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a successful authentication.
    pub fn login(&self, identity: Identity, access_token: AccessToken) {
        self.session.set_credentials(identity, access_token);
    }

    /// Capability set for the current session; evaluate once per render.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_role(self.session.role(), &self.table)
    }

    /// Navigate to `path`, following the guard's redirect if it denies access.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        let identity = self.session.identity();
        let decision = self.guard.navigate(&self.table, path, identity.as_ref());
        let target = match decision.redirect() {
            Some(redirect) => {
                tracing::info!(
                    from = path,
                    to = %redirect.to,
                    reason = ?redirect.reason,
                    "redirecting"
                );
                self.navigator.redirect(&redirect.to);
                redirect.to.as_str()
            }
            None => path,
        };
        self.set_location(target);
        decision
    }

    /// Re-check the current location after the session changed.
    pub fn revalidate(&self) -> GuardDecision {
        let current = self.location();
        self.navigate(&current)
    }

    /// Re-check the current location whenever the session changes.
    ///
    /// The task runs until its handle is aborted.
    pub fn follow_session(&self) -> tokio::task::JoinHandle<()> {
        let console = self.clone();
        let mut changes = self.session.subscribe();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let _ = console.revalidate();
            }
        })
    }

    /// Confirm, clear the session, send the user to login, then report.
    ///
    /// The guard redirects from protected locations; a public one (login
    /// itself) is left explicitly so every logout ends on the login path.
    pub async fn logout(&self) -> Result<LogoutOutcome, ConfirmError> {
        let Some(_in_progress) = InProgress::enter(&self.logging_out) else {
            return Ok(LogoutOutcome::AlreadyInProgress);
        };

        let options = ConfirmOptions::new("Are you sure you want to logout from your account?")
            .title("Confirm Logout")
            .confirm_text("Yes, Logout")
            .cancel_text("Cancel");
        if !self.confirm.confirm(options).await? {
            return Ok(LogoutOutcome::Cancelled);
        }

        self.session.clear();
        let redirect = match self.revalidate() {
            GuardDecision::Redirect(redirect) => redirect,
            GuardDecision::Allow => {
                let redirect = Redirect {
                    to: self.guard.login_path().to_string(),
                    reason: RedirectReason::Unauthenticated,
                };
                self.navigator.redirect(&redirect.to);
                self.set_location(&redirect.to);
                redirect
            }
        };
        self.notifier.success("Logged out successfully");
        Ok(LogoutOutcome::LoggedOut { redirect })
    }

    /// Run a query; failures become error notifications.
    pub async fn fetch<T, E, F>(&self, what: &str, query: F) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        fetch_or_report(&self.notifier, what, query).await
    }

    /// Render a view, escalating faults to the fallback view.
    pub fn render<T>(&self, view: impl FnOnce() -> anyhow::Result<T>) -> Result<T, FallbackView> {
        render_or_fallback(self.guard.landing_path(), view)
    }

    fn set_location(&self, path: &str) {
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }
}

impl core::fmt::Debug for Console {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Console")
            .field("session", &self.session)
            .field("location", &self.location())
            .field("confirm", &self.confirm)
            .finish()
    }
}
