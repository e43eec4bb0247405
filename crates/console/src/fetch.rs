//! Data-fetch boundary: queries resolve or fail, failures become notifications.

use std::fmt::Display;
use std::future::Future;

use crate::notify::Notifier;

/// Await `query`; on failure log it, raise an error notification and yield `None`.
///
/// `what` names the data for the user ("tickets", "users", ...). Retries, if
/// any, are the query's own business.
pub async fn fetch_or_report<T, E, F>(notifier: &Notifier, what: &str, query: F) -> Option<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match query.await {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(query = what, error = %err, "data fetch failed");
            notifier.error(format!("Failed to load {what}. Please try again."));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::notify::NotificationKind;

    async fn delayed<T>(latency: Duration, value: T) -> T {
        tokio::time::sleep(latency).await;
        value
    }

    #[tokio::test(start_paused = true)]
    async fn success_passes_value_through() {
        let notifier = Notifier::default();
        let tickets = fetch_or_report(&notifier, "tickets", async {
            Ok::<_, String>(delayed(Duration::from_millis(800), vec!["CMP-1029", "CMP-1030"]).await)
        })
        .await;

        assert_eq!(tickets, Some(vec!["CMP-1029", "CMP-1030"]));
        assert!(notifier.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_becomes_error_notification() {
        let notifier = Notifier::default();
        let ticket: Option<()> = fetch_or_report(&notifier, "ticket CMP-9999", async {
            delayed(Duration::from_millis(600), Err("not found")).await
        })
        .await;

        assert_eq!(ticket, None);
        let active = notifier.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NotificationKind::Error);
        assert_eq!(active[0].message, "Failed to load ticket CMP-9999. Please try again.");
    }
}
