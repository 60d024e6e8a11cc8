//! HTTP surface.
//!
//! Each resource group exposes a `routes()` constructor; [`router`] merges
//! them and adds the CORS and trace layers.

pub mod health;
pub mod stations;
pub mod stats;
pub mod workouts;

use std::sync::Arc;

use axum::{
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, Method},
  Router,
};
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};
use tracing::warn;

use crate::config::AllowedOrigins;
use crate::error::AppError;
use crate::store::Store;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
}

impl AppState {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }
}

pub fn router(state: AppState, origins: &AllowedOrigins) -> Router {
  Router::new()
    .merge(health::HealthRoutes::routes())
    .merge(stats::StatsRoutes::routes(state.clone()))
    .merge(workouts::WorkoutRoutes::routes(state.clone()))
    .merge(stations::StationRoutes::routes(state))
    .layer(cors_layer(origins))
    .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
  let base = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers(Any);

  match origins {
    AllowedOrigins::Any => base.allow_origin(Any),
    AllowedOrigins::List(list) => {
      let values: Vec<HeaderValue> = list
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
          Ok(value) => Some(value),
          Err(_) => {
            warn!(origin = %origin, "Ignoring unparseable CORS origin");
            None
          }
        })
        .collect();
      base.allow_origin(AllowOrigin::list(values))
    }
  }
}

/// ---------------------------------------------------------------------------
/// Extractor Rejections
/// ---------------------------------------------------------------------------

impl From<QueryRejection> for AppError {
  fn from(rejection: QueryRejection) -> Self {
    AppError::validation(rejection.body_text())
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    AppError::validation(rejection.body_text())
  }
}

impl From<PathRejection> for AppError {
  fn from(rejection: PathRejection) -> Self {
    AppError::validation(rejection.body_text())
  }
}
