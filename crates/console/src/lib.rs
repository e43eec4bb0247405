//! `civicdesk-console`
//!
//! **Responsibility:** the coordination layer of the citizen-services admin console.
//!
//! This crate provides:
//! - A confirmation coordinator (one pending yes/no request, awaited by the caller)
//! - A notification coordinator (timed, auto-expiring status messages)
//! - The shell wiring session state, route guard and both coordinators
//! - Data-fetch failure reporting and the fallback view for rendering faults
//!
//! Rendering itself lives in the host; this crate only exposes what to show.

pub mod config;
pub mod confirm;
pub mod fallback;
pub mod fetch;
pub mod notify;
pub mod scroll;
pub mod shell;

pub use config::{ConfigError, ConsoleConfig};
pub use confirm::{
    ConfirmCoordinator, ConfirmError, ConfirmOptions, ConfirmRequest, DialogTone, Resolution,
};
pub use fallback::{FallbackView, RecoveryAction, render_or_fallback};
pub use fetch::fetch_or_report;
pub use notify::{Notification, NotificationKind, NotificationTimings, Notifier};
pub use scroll::{ScrollCounter, ScrollGuard, ScrollLock};
pub use shell::{Console, HistoryNavigator, LogoutOutcome, Navigator};
