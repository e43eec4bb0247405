//! Top-level fallback for unhandled rendering faults.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;

const GENERIC_MESSAGE: &str = "An unexpected rendering error occurred in the application.";

/// The single way back to a known-good location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryAction {
    pub label: String,
    pub path: String,
}

/// What the shell shows instead of a view that failed to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackView {
    pub title: String,
    pub message: String,
    pub recovery: RecoveryAction,
}

impl FallbackView {
    pub fn new(message: Option<String>, recovery_path: impl Into<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_MESSAGE.to_string());
        Self {
            title: "System Error".to_string(),
            message,
            recovery: RecoveryAction {
                label: "Return to Dashboard".to_string(),
                path: recovery_path.into(),
            },
        }
    }

    pub fn from_error(err: &anyhow::Error, recovery_path: impl Into<String>) -> Self {
        Self::new(Some(err.to_string()), recovery_path)
    }
}

/// Run a view; errors and panics escalate to a [`FallbackView`].
pub fn render_or_fallback<T>(
    recovery_path: &str,
    view: impl FnOnce() -> anyhow::Result<T>,
) -> Result<T, FallbackView> {
    match catch_unwind(AssertUnwindSafe(view)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            tracing::error!(error = ?err, "view failed to render");
            Err(FallbackView::from_error(&err, recovery_path))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(
                panic = message.as_deref().unwrap_or("<non-string payload>"),
                "view panicked"
            );
            Err(FallbackView::new(message, recovery_path))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}
