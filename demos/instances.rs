//! Start, list and stop LLM instances on the external port pool.

use velesio_console::{ConsoleClient, ConsoleResult, InstanceForm};

#[tokio::main]
async fn main() -> ConsoleResult<()> {
    dotenvy::dotenv().ok();
    let base_url = std::env::var("VELESIO_API_URL")
        .unwrap_or_else(|_| velesio_console::config::DEFAULT_BASE_URL.to_string());

    let client = ConsoleClient::builder()
        .base_url(base_url)
        .accept_invalid_certs(true)
        .build()?;

    let registry = client.dashboard().instances().clone();
    registry.refresh().await;
    registry.refresh_models().await;

    let models = registry.models().await;
    println!("Models on the box: {:?}", models);

    for (port, instance) in registry.instances().await {
        println!(
            "Port {}: {} (pid {:?})",
            port, instance.config.model, instance.pid
        );
    }

    let free = registry.free_ports().await;
    let (Some(model), Some(port)) = (models.first(), free.first()) else {
        println!("Nothing to start: no model or no free port");
        return Ok(());
    };

    registry
        .set_form(InstanceForm {
            model: model.clone(),
            external_port: port.get(),
            ..InstanceForm::default()
        })
        .await;
    registry.start().await?;
    println!("Started {} on port {}", model, port);

    // Read the instance log once, then stop it again.
    registry.toggle_logs(port.get()).await?;
    if let Some(viewer) = registry.log_viewer().await {
        viewer.refresh().await;
        println!("{}", viewer.text().await);
    }

    registry.stop(port.get()).await?;
    println!("Stopped port {}", port);

    Ok(())
}
