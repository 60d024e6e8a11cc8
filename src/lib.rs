pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod range;
pub mod routes;
pub mod stats;
pub mod store;
pub mod units;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use config::ServerConfig;
use error::ServerError;
use logging::LoggingConfig;
use routes::AppState;
use store::SqliteStore;
use tracing::info;

/// Load configuration, open the database and serve until Ctrl-C
pub async fn run() -> Result<(), ServerError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  LoggingConfig::from_env().init()?;
  let config = ServerConfig::from_env()?;

  let pool = db::initialize_db(&config).await?;
  let state = AppState::new(Arc::new(SqliteStore::new(pool.clone())));
  let app = routes::router(state, &config.allowed_origins);

  let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
  info!(addr = %config.bind_addr, "Listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  pool.close().await;
  info!("Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!("Shutdown signal received");
}
