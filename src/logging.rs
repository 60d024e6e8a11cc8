//! Structured logging setup on top of `tracing-subscriber`

use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{
  filter::Directive,
  fmt,
  layer::SubscriberExt,
  util::{SubscriberInitExt, TryInitError},
  EnvFilter,
};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Json,
  Pretty,
  Compact,
}

impl LogFormat {
  fn parse(raw: Option<&str>) -> Self {
    match raw.map(str::trim) {
      Some("json") => Self::Json,
      Some("compact") => Self::Compact,
      _ => Self::Pretty,
    }
  }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
  /// Base filter directive; `RUST_LOG` syntax
  pub level: String,
  pub format: LogFormat,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".into(),
      format: LogFormat::Pretty,
    }
  }
}

impl LoggingConfig {
  pub fn from_env() -> Self {
    Self {
      level: env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "info".into()),
      format: LogFormat::parse(env::var("LOG_FORMAT").ok().as_deref()),
    }
  }

  /// Build the filter: the configured level plus fixed noise reduction
  pub fn env_filter(&self) -> EnvFilter {
    let mut filter = EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"));
    for directive in ["sqlx=warn", "sqlx::query=warn", "hyper=warn", "tower_http=info"] {
      if let Ok(d) = directive.parse::<Directive>() {
        filter = filter.add_directive(d);
      }
    }
    filter
  }

  /// Install the global subscriber. Fails if one is already set.
  pub fn init(&self) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(self.env_filter());

    match self.format {
      LogFormat::Json => registry
        .with(fmt::layer().json().with_target(true).with_writer(io::stdout))
        .try_init()?,
      LogFormat::Pretty => registry
        .with(fmt::layer().with_target(true).with_writer(io::stdout))
        .try_init()?,
      LogFormat::Compact => registry
        .with(fmt::layer().compact().with_target(false).with_writer(io::stdout))
        .try_init()?,
    }

    info!(
      service.version = env!("CARGO_PKG_VERSION"),
      log.level = %self.level,
      log.format = ?self.format,
      "Logging initialized"
    );
    Ok(())
  }
}
