//! Watch the service status and resource usage of a GPU box.
//!
//! This program mounts the dashboard against a control API, prints the
//! status board and the latest resource sample a few times, then
//! unmounts so every poller stops.

use std::time::Duration;
use velesio_console::{ConsoleClientBuilder, ConsoleConfig, ConsoleResult, logging::init_tracing};

#[tokio::main]
async fn main() -> ConsoleResult<()> {
    dotenvy::dotenv().ok();

    // Defaults, then VELESIO_API_URL / VELESIO_LOG_LEVEL / VELESIO_LOG_FORMAT.
    let config = ConsoleConfig::default().with_env_overrides();
    init_tracing(&config.logging)?;

    let client = ConsoleClientBuilder::from_config(config)
        .accept_invalid_certs(true) // Self-signed certs on the box
        .build()?;

    let dashboard = client.dashboard();
    let session = dashboard.mount().await?;
    println!(
        "Polling: {}",
        session.pollers().collect::<Vec<_>>().join(", ")
    );

    for _ in 0..5 {
        tokio::time::sleep(Duration::from_secs(3)).await;

        println!(
            "LLM: {:<8} SD: {:<8} WebUI: {}",
            dashboard.board().llm().await,
            dashboard.board().sd().await,
            if dashboard.stable_diffusion().webui_available() {
                "ready"
            } else {
                "offline"
            }
        );
        match dashboard.resources().sample().await {
            Some(sample) => println!(
                "  CPU {:>5.1}%  RAM {:>5.1}%  GPU {:>5.1}%",
                sample.cpu, sample.ram, sample.gpu
            ),
            None => println!("  Resource usage unavailable"),
        }
    }

    // Show what the LLM server has logged so far.
    let logs = dashboard.llm().logs();
    logs.refresh().await;
    println!("\n--- LLM logs ---\n{}", logs.text().await);

    session.unmount().await;
    Ok(())
}
