//! Error types shared by the store and the HTTP layer

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;

/// ---------------------------------------------------------------------------
/// Store Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// ---------------------------------------------------------------------------
/// Startup Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
  #[error(transparent)]
  Config(#[from] crate::config::ConfigError),

  #[error("Failed to initialize logging: {0}")]
  Logging(#[from] tracing_subscriber::util::TryInitError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("Server I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// ---------------------------------------------------------------------------
/// Request Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("Invalid request: {0}")]
  Validation(String),

  #[error("Workout {0} is not a HYROX workout; station entries require one")]
  NotHyroxWorkout(i64),

  #[error("{0} not found")]
  NotFound(String),

  #[error(transparent)]
  Store(#[from] StoreError),
}

impl AppError {
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  pub fn not_found(what: impl Into<String>) -> Self {
    Self::NotFound(what.into())
  }

  pub fn status_code(&self) -> StatusCode {
    match self {
      Self::Validation(_) | Self::NotHyroxWorkout(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  pub fn code(&self) -> &'static str {
    match self {
      Self::Validation(_) => "validation_error",
      Self::NotHyroxWorkout(_) => "not_hyrox_workout",
      Self::NotFound(_) => "not_found",
      Self::Store(_) => "internal_error",
    }
  }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
  error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
  code: &'static str,
  message: String,
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status_code();

    // Store failures are not the client's fault; keep the detail in the logs
    let message = match &self {
      Self::Store(err) => {
        tracing::error!(error = %err, "store failure while handling request");
        "Internal server error".to_string()
      }
      other => other.to_string(),
    };

    let body = ErrorBody {
      error: ErrorDetail {
        code: self.code(),
        message,
      },
    };

    (status, Json(body)).into_response()
  }
}
