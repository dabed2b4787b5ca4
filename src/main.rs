use log::*;
use service::{config::Config, init_identity_provider, logging::Logger, AppState};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::new();
    Logger::init_logger(&config)?;

    info!("Starting up...");

    let identity_provider = init_identity_provider(&config).map_err(|e| {
        error!("Failed to build the identity provider client: {e}");
        e
    })?;

    let app_state = AppState::new(config, &identity_provider);

    web::init_server(app_state).await.map_err(|e| {
        error!("Server stopped: {e}");
        e
    })?;

    Ok(())
}
