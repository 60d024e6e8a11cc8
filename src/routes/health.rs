use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
  pub status: &'static str,
  pub version: &'static str,
}

pub struct HealthRoutes;

impl HealthRoutes {
  pub fn routes() -> Router {
    Router::new().route("/health", get(Self::handle_health))
  }

  async fn handle_health() -> Json<HealthStatus> {
    Json(HealthStatus {
      status: "ok",
      version: env!("CARGO_PKG_VERSION"),
    })
  }
}
