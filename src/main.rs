// Main entry point - Configuration, wiring and the console loop
mod application;
mod domain;
mod infrastructure;
mod presentation;

use tracing_subscriber::EnvFilter;

use crate::application::cycle_stream::shared;
use crate::application::panel_controller::PanelController;
use crate::infrastructure::config::load_panel_config;
use crate::infrastructure::serial_transport::SerialTransport;
use crate::presentation::app_state::AppState;
use crate::presentation::console;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the rendered panel
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(serve());
    // A cycle stuck in a device read must not hold the process open on exit
    runtime.shutdown_background();
    result
}

async fn serve() -> anyhow::Result<()> {
    let config = load_panel_config()?;

    let transport = Box::new(SerialTransport::new(&config.transport.port));
    let panel = PanelController::from_config(&config, transport)?;
    let state = AppState::new(shared(panel), &config);

    tracing::info!(
        simulation = config.panel.simulation,
        auto_update = config.panel.auto_update,
        interval_ms = config.panel.update_interval_ms,
        port = %config.transport.port,
        "Weather panel started, type 'help' for commands"
    );

    console::run(state).await
}
