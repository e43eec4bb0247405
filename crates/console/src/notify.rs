//! Notification coordinator: transient, auto-expiring status messages.
//!
//! Lifecycle of every entry is `active -> removing -> deleted`:
//! - `display` after creation (or immediately on manual dismiss) the entry is
//!   flagged `removing` so the presentation layer can play its exit animation;
//! - `exit` later it is deleted.
//!
//! Entries are kept in insertion order. Each has its own timers, and identical
//! messages are not merged.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;

use civicdesk_core::NotificationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    /// Exit animation in progress; deletion follows.
    pub removing: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTimings {
    pub display: Duration,
    pub exit: Duration,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(3000),
            exit: Duration::from_millis(250),
        }
    }
}

/// Queue of active notifications.
///
/// Cheap to clone; clones share the queue. Timers are tokio tasks, so methods
/// that create or dismiss entries must be called from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct Notifier {
    active: Arc<watch::Sender<Vec<Notification>>>,
    timings: NotificationTimings,
}

impl Notifier {
    pub fn new(timings: NotificationTimings) -> Self {
        let (active, _rx) = watch::channel(Vec::new());
        Self {
            active: Arc::new(active),
            timings,
        }
    }

    pub fn timings(&self) -> NotificationTimings {
        self.timings
    }

    /// Append a notification and start its expiry timer.
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        let notification = Notification {
            id: NotificationId::new(),
            kind,
            message: message.into(),
            removing: false,
            created_at: Utc::now(),
        };
        let id = notification.id;
        let expires_at = Instant::now() + self.timings.display;

        tracing::debug!(notification = %id, ?kind, "notification added");
        self.active.send_modify(|list| list.push(notification));

        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            this.begin_removal(id);
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.notify(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.notify(NotificationKind::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.notify(NotificationKind::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.notify(NotificationKind::Info, message)
    }

    /// User closed the notification: skip the display wait and start the exit.
    ///
    /// Returns `false` if it is already removing or gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.begin_removal(id)
    }

    /// Active entries (including those removing), oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.active.borrow().clone()
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.active.borrow().iter().find(|n| n.id == id).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.active.subscribe()
    }

    fn begin_removal(&self, id: NotificationId) -> bool {
        let started = self.active.send_if_modified(|list| {
            match list.iter_mut().find(|n| n.id == id && !n.removing) {
                Some(n) => {
                    n.removing = true;
                    true
                }
                None => false,
            }
        });
        if !started {
            return false;
        }

        tracing::debug!(notification = %id, "notification removing");
        let deadline = Instant::now() + self.timings.exit;
        let active = self.active.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            active.send_if_modified(|list| {
                let before = list.len();
                list.retain(|n| n.id != id);
                list.len() != before
            });
            tracing::debug!(notification = %id, "notification deleted");
        });
        true
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotificationTimings::default())
    }
}
