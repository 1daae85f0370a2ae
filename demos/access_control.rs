//! Manage who can reach the proxy in front of the stack.
//!
//! Shows both access contracts: the combined allow/block list and the
//! per-service allowlist files.

use velesio_console::{
    AccessControlMode, ConsoleClient, ConsoleResult, IpAccessPanel, ListKind, ServiceKind,
};

#[tokio::main]
async fn main() -> ConsoleResult<()> {
    dotenvy::dotenv().ok();
    let base_url = std::env::var("VELESIO_API_URL")
        .unwrap_or_else(|_| velesio_console::config::DEFAULT_BASE_URL.to_string());

    // Combined allow/block list.
    let client = ConsoleClient::builder()
        .base_url(&base_url)
        .accept_invalid_certs(true)
        .access_control(AccessControlMode::Combined)
        .build()?;

    let panel = IpAccessPanel::new(client.api());
    panel.refresh().await;
    println!("{}", panel.access_summary().await);

    let lists = panel.lists().await;
    println!("Allowed: {:?}", lists.allowed);
    println!("Blocked: {:?}", lists.blocked);

    // Failures land in the status line as well as the returned error.
    let _ = panel.add("203.0.113.7", ListKind::Block).await;
    if let Some(status) = panel.status().await {
        println!("{}", status.message());
    }

    // Per-service allowlist files.
    let client = ConsoleClient::builder()
        .base_url(&base_url)
        .accept_invalid_certs(true)
        .access_control(AccessControlMode::PerService)
        .build()?;

    let dashboard = client.dashboard();
    if let Some(files) = dashboard.access().as_per_service() {
        for service in ServiceKind::ALL {
            files.load(service).await;
            println!("\n[{}]\n{}", service, files.content().await);
        }
    }

    Ok(())
}
