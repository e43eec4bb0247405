use std::sync::Arc;
use std::time::Duration;

use civicdesk_auth::{AccessToken, Identity, RedirectReason, Role, RoleSet, RouteGuard};
use civicdesk_console::{
    ConfirmError, Console, ConsoleConfig, HistoryNavigator, LogoutOutcome, NotificationKind,
    Resolution, ScrollCounter,
};
use civicdesk_core::AdminId;
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct Harness {
    console: Console,
    navigator: Arc<HistoryNavigator>,
    scroll: Arc<ScrollCounter>,
}

impl Harness {
    fn new() -> Self {
        let navigator = Arc::new(HistoryNavigator::new());
        let scroll = Arc::new(ScrollCounter::new());
        let console = Console::new(&ConsoleConfig::default(), navigator.clone(), scroll.clone());
        Self {
            console,
            navigator,
            scroll,
        }
    }

    fn logged_in(role: Role) -> Self {
        let harness = Self::new();
        let identity = Identity::new(AdminId::new(), "officer@citizen.gov", role).unwrap();
        harness.console.login(identity, AccessToken::new("session-token"));
        harness
    }

    /// Start a logout and wait until its confirmation is on screen.
    async fn start_logout(&self) -> JoinHandle<Result<LogoutOutcome, ConfirmError>> {
        let console = self.console.clone();
        let handle = tokio::spawn(async move { console.logout().await });

        let mut pending = self.console.confirmations().subscribe();
        let request = pending.wait_for(|r| r.is_some()).await.unwrap().clone().unwrap();
        assert_eq!(request.title, "Confirm Logout");
        assert_eq!(request.confirm_text, "Yes, Logout");
        assert_eq!(request.cancel_text, "Cancel");
        handle
    }
}

#[test]
fn unauthenticated_request_for_gated_route_redirects_to_login() {
    let harness = Harness::new();
    let mut rendered = false;

    let outcome = harness.console.navigate("/users").render(|| rendered = true);

    let redirect = outcome.unwrap_err();
    assert_eq!(redirect.to, "/login");
    assert_eq!(redirect.reason, RedirectReason::Unauthenticated);
    assert!(!rendered);
    assert_eq!(harness.navigator.history(), ["/login"]);
}

#[test]
fn support_role_on_super_admin_route_lands_on_default() {
    let support = Identity::new(AdminId::new(), "help@citizen.gov", Role::SupportAdmin).unwrap();
    let decision = RouteGuard::default().check(Some(&support), RoleSet::of(&[Role::SuperAdmin]));

    let redirect = decision.redirect().unwrap();
    assert_eq!(redirect.to, "/");
    assert_eq!(redirect.reason, RedirectReason::RoleNotPermitted(Role::SupportAdmin));
}

#[tokio::test]
async fn cancelled_logout_changes_nothing() {
    let dismissals = [
        Resolution::Cancel,
        Resolution::Escape,
        Resolution::Backdrop,
        Resolution::CloseButton,
    ];
    for dismissal in dismissals {
        let harness = Harness::logged_in(Role::Admin);
        assert!(harness.console.navigate("/services").is_allowed());
        let before = harness.console.session().identity();

        let logout = harness.start_logout().await;
        assert!(harness.scroll.is_locked());
        harness.console.confirmations().resolve(dismissal).unwrap();

        assert_eq!(logout.await.unwrap(), Ok(LogoutOutcome::Cancelled));
        assert_eq!(harness.console.session().identity(), before);
        assert_eq!(harness.console.location(), "/services");
        assert!(harness.navigator.history().is_empty());
        assert!(harness.console.notifications().active().is_empty());
        assert_eq!(harness.scroll.locks(), harness.scroll.unlocks());
    }
}

#[tokio::test(start_paused = true)]
async fn confirmed_logout_clears_redirects_and_notifies() {
    let harness = Harness::logged_in(Role::SuperAdmin);
    assert!(harness.console.navigate("/chat").is_allowed());

    let logout = harness.start_logout().await;
    harness.console.confirmations().approve().unwrap();
    let outcome = logout.await.unwrap().unwrap();
    let confirmed_at = Instant::now();

    let LogoutOutcome::LoggedOut { redirect } = outcome else {
        panic!("expected a redirect after logout, got {outcome:?}");
    };
    assert_eq!(redirect.to, "/login");
    assert!(!harness.console.session().is_authenticated());
    assert!(harness.console.session().access_token().is_none());
    assert_eq!(harness.console.location(), "/login");
    assert_eq!(harness.navigator.history(), ["/login"]);
    assert_eq!(harness.scroll.locks(), 1);
    assert_eq!(harness.scroll.unlocks(), 1);

    let active = harness.console.notifications().active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, NotificationKind::Success);
    assert_eq!(active[0].message, "Logged out successfully");

    tokio::time::sleep_until(confirmed_at + Duration::from_millis(3251)).await;
    assert!(harness.console.notifications().active().is_empty());
}

#[tokio::test]
async fn logout_from_login_page_still_lands_on_login() {
    let harness = Harness::logged_in(Role::Admin);
    assert!(harness.console.navigate("/login").is_allowed());

    let logout = harness.start_logout().await;
    harness.console.confirmations().approve().unwrap();

    let LogoutOutcome::LoggedOut { redirect } = logout.await.unwrap().unwrap() else {
        panic!("expected logout to complete");
    };
    assert_eq!(redirect.to, "/login");
    assert_eq!(redirect.reason, RedirectReason::Unauthenticated);
    assert!(!harness.console.session().is_authenticated());
    assert_eq!(harness.console.location(), "/login");
    assert_eq!(harness.navigator.history(), ["/login"]);
}

#[tokio::test]
async fn logout_can_be_retried_after_cancel() {
    let harness = Harness::logged_in(Role::SupportAdmin);

    let first = harness.start_logout().await;
    harness.console.confirmations().cancel().unwrap();
    assert_eq!(first.await.unwrap(), Ok(LogoutOutcome::Cancelled));

    let second = harness.start_logout().await;
    harness.console.confirmations().approve().unwrap();
    assert!(matches!(
        second.await.unwrap(),
        Ok(LogoutOutcome::LoggedOut { .. })
    ));
    assert_eq!(harness.scroll.locks(), 2);
    assert_eq!(harness.scroll.unlocks(), 2);
}

#[tokio::test]
async fn failed_fetch_is_reported_not_fatal() {
    let harness = Harness::logged_in(Role::Admin);
    let users: Option<Vec<String>> = harness
        .console
        .fetch("users", async { Err::<Vec<String>, _>("connection refused") })
        .await;

    assert!(users.is_none());
    let active = harness.console.notifications().active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, NotificationKind::Error);

    let view = harness
        .console
        .render::<()>(|| anyhow::bail!("ticket sidebar crashed"))
        .unwrap_err();
    assert_eq!(view.recovery.path, "/");
    assert!(harness.console.session().is_authenticated());
}
