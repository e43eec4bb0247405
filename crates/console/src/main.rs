//! Headless walkthrough of the console's coordination layer.
//!
//! Logs in a demo administrator, walks the navigation table, then runs the
//! logout flow with a simulated user who approves the confirmation.

use std::sync::Arc;

use anyhow::Context;

use civicdesk_auth::{AccessToken, Identity, Role};
use civicdesk_console::{Console, ConsoleConfig, HistoryNavigator, ScrollCounter};
use civicdesk_core::AdminId;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = ConsoleConfig::from_env().context("failed to load console configuration")?;
    civicdesk_observability::init(config.log_format);

    tracing::info!(api = %config.api_base_url, "starting console walkthrough");

    let navigator = Arc::new(HistoryNavigator::new());
    let scroll = Arc::new(ScrollCounter::new());
    let console = Console::new(&config, navigator.clone(), scroll.clone());

    // Nobody is logged in yet.
    let decision = console.navigate("/complaints");
    tracing::info!(
        allowed = decision.is_allowed(),
        location = %console.location(),
        "anonymous navigation"
    );

    let role: Role = std::env::var("CIVICDESK_DEMO_ROLE")
        .unwrap_or_else(|_| Role::SupportAdmin.to_string())
        .parse()
        .context("CIVICDESK_DEMO_ROLE must be a known role")?;
    let identity = Identity::new(AdminId::new(), "demo@citizen.gov", role)?;
    console.login(identity, AccessToken::new("demo-token"));

    let capabilities = console.capabilities();
    println!("{}", serde_json::to_string_pretty(&capabilities)?);

    for path in ["/", "/users", "/complaints/CMP-1029", "/chat"] {
        let decision = console.navigate(path);
        tracing::info!(
            path,
            allowed = decision.is_allowed(),
            location = %console.location(),
            "navigated"
        );
    }

    let user = {
        let console = console.clone();
        tokio::spawn(async move {
            let mut pending = console.confirmations().subscribe();
            if pending.wait_for(|r| r.is_some()).await.is_ok() {
                let _ = console.confirmations().approve();
            }
        })
    };
    let outcome = console.logout().await?;
    user.await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    let timings = console.notifications().timings();
    tokio::time::sleep(timings.display + timings.exit).await;

    tracing::info!(
        redirects = ?navigator.history(),
        scroll_locks = scroll.locks(),
        scroll_unlocks = scroll.unlocks(),
        remaining_notifications = console.notifications().active().len(),
        "walkthrough finished"
    );
    Ok(())
}
