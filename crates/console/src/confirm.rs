//! Confirmation coordinator: one pending yes/no request at a time.
//!
//! Any caller can `confirm(..).await` a decision; the presentation layer watches
//! [`ConfirmCoordinator::subscribe`] for the request to show and reports the
//! user's action through [`ConfirmCoordinator::resolve`].
//!
//! - A second `confirm` while one is pending fails with
//!   [`ConfirmError::AlreadyPending`]; it never replaces the first.
//! - Every request is resolved exactly once: confirm gives `true`; cancel,
//!   backdrop, escape and the close button give `false`.
//! - Tearing the host down with [`ConfirmCoordinator::teardown`] resolves the
//!   waiting caller to `false`.
//! - Background scroll is locked while the request is pending and released once.
//! - The slot and the published request change under the same lock, so a
//!   subscriber never sees `None` while a caller is waiting.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{oneshot, watch};

use civicdesk_core::RequestId;

use crate::scroll::{ScrollGuard, ScrollLock};

/// Visual tone of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogTone {
    Danger,
    #[default]
    Warning,
    Info,
}

/// What the caller asks for. Unset labels fall back to the dialog defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfirmOptions {
    pub title: Option<String>,
    pub message: String,
    pub confirm_text: Option<String>,
    pub cancel_text: Option<String>,
    pub tone: DialogTone,
}

impl ConfirmOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = Some(text.into());
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    pub fn tone(mut self, tone: DialogTone) -> Self {
        self.tone = tone;
        self
    }
}

/// A pending request as the presentation layer sees it (defaults applied).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmRequest {
    pub id: RequestId,
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub tone: DialogTone,
}

impl From<ConfirmOptions> for ConfirmRequest {
    fn from(options: ConfirmOptions) -> Self {
        Self {
            id: RequestId::new(),
            title: options.title.unwrap_or_else(|| "Confirm Action".to_string()),
            message: options.message,
            confirm_text: options.confirm_text.unwrap_or_else(|| "Confirm".to_string()),
            cancel_text: options.cancel_text.unwrap_or_else(|| "Cancel".to_string()),
            tone: options.tone,
        }
    }
}

/// The user action that ended a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Confirm,
    Cancel,
    Backdrop,
    Escape,
    CloseButton,
}

impl Resolution {
    pub fn approved(self) -> bool {
        matches!(self, Resolution::Confirm)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfirmError {
    #[error("a confirmation request is already pending ({pending})")]
    AlreadyPending { pending: RequestId },

    #[error("no confirmation request is pending")]
    NothingPending,
}

struct Pending {
    request: ConfirmRequest,
    reply: oneshot::Sender<bool>,
    _scroll: ScrollGuard,
}

/// Request/response bridge between callers and the single shared dialog.
///
/// Cheap to clone; clones share the pending slot.
#[derive(Clone)]
pub struct ConfirmCoordinator {
    slot: Arc<Mutex<Option<Pending>>>,
    visible: Arc<watch::Sender<Option<ConfirmRequest>>>,
    scroll: Arc<dyn ScrollLock>,
}

impl ConfirmCoordinator {
    pub fn new(scroll: Arc<dyn ScrollLock>) -> Self {
        let (visible, _rx) = watch::channel(None);
        Self {
            slot: Arc::new(Mutex::new(None)),
            visible: Arc::new(visible),
            scroll,
        }
    }

    /// Ask the user; resolves once they act.
    ///
    /// Fails immediately if another request is still pending.
    pub async fn confirm(&self, options: ConfirmOptions) -> Result<bool, ConfirmError> {
        let reply = self.open(options)?;
        // A dropped sender means the host was torn down.
        Ok(reply.await.unwrap_or(false))
    }

    fn open(&self, options: ConfirmOptions) -> Result<oneshot::Receiver<bool>, ConfirmError> {
        let mut slot = self.slot();
        if let Some(pending) = slot.as_ref() {
            tracing::warn!(
                pending = %pending.request.id,
                "overlapping confirmation request rejected"
            );
            return Err(ConfirmError::AlreadyPending {
                pending: pending.request.id,
            });
        }

        let request = ConfirmRequest::from(options);
        let (reply, rx) = oneshot::channel();
        tracing::debug!(request = %request.id, title = %request.title, "confirmation requested");

        *slot = Some(Pending {
            request: request.clone(),
            reply,
            _scroll: ScrollGuard::acquire(self.scroll.clone()),
        });
        self.visible.send_replace(Some(request));
        Ok(rx)
    }

    /// Resolve the pending request. Returns the value delivered to the caller.
    pub fn resolve(&self, resolution: Resolution) -> Result<bool, ConfirmError> {
        let pending = self.take()?;

        let approved = resolution.approved();
        tracing::debug!(
            request = %pending.request.id,
            ?resolution,
            approved,
            "confirmation resolved"
        );

        let Pending { reply, _scroll, .. } = pending;
        drop(_scroll);
        // The caller may have stopped waiting; the request is resolved either way.
        let _ = reply.send(approved);
        Ok(approved)
    }

    pub fn approve(&self) -> Result<bool, ConfirmError> {
        self.resolve(Resolution::Confirm)
    }

    pub fn cancel(&self) -> Result<bool, ConfirmError> {
        self.resolve(Resolution::Cancel)
    }

    /// Drop the pending request without a user action; its caller sees `false`.
    pub fn teardown(&self) -> bool {
        match self.take() {
            Ok(pending) => {
                tracing::debug!(request = %pending.request.id, "confirmation host torn down");
                true
            }
            Err(_) => false,
        }
    }

    pub fn pending(&self) -> Option<ConfirmRequest> {
        self.visible.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.visible.borrow().is_some()
    }

    /// Observe the request to present (`None` when nothing is pending).
    pub fn subscribe(&self) -> watch::Receiver<Option<ConfirmRequest>> {
        self.visible.subscribe()
    }

    /// Empty the slot and withdraw the published request in one critical section.
    fn take(&self) -> Result<Pending, ConfirmError> {
        let mut slot = self.slot();
        let pending = slot.take().ok_or(ConfirmError::NothingPending)?;
        self.visible.send_replace(None);
        Ok(pending)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Pending>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for ConfirmCoordinator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConfirmCoordinator")
            .field("pending", &*self.visible.borrow())
            .finish()
    }
}
