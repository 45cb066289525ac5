//! Health Risk HTTP Server
//!
//! Standalone HTTP server for the health risk classifier

use actix_web::{middleware, web, App, HttpServer};
use health_risk::api::{configure_routes, ApiServerState};
use health_risk::{init_logging, Config, DeploymentMode, Result};

#[actix_rt::main]
async fn main() -> Result<()> {
    let mode = DeploymentMode::from_env();
    init_logging(mode)?;

    log::info!("Starting Health Risk Prediction API server...");

    let config = Config::load().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        e
    })?;

    // the model is loaded exactly once; without it the server does not start
    let state = ApiServerState::from_config(&config).map_err(|e| {
        log::error!("Failed to load model: {}", e);
        e
    })?;
    let state = web::Data::new(state);

    let (host, port) = config.bind_addr();
    log::info!(
        "Server will listen on {}:{} with {} workers (auto-reload: {})",
        host,
        port,
        config.server.workers,
        config.mode.auto_reload()
    );
    if config.mode.auto_reload() {
        log::debug!("Development mode: restart on change is left to the file watcher");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .workers(config.server.workers)
    .shutdown_timeout(config.mode.shutdown_timeout_secs())
    .bind((host.as_str(), port))?
    .run()
    .await?;

    log::info!("Server stopped.");

    Ok(())
}
