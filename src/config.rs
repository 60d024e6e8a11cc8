use std::env;
use std::net::SocketAddr;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DATABASE_URL: &str = "sqlite://hyron.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub const ENV_DATABASE_URL: &str = "HYRON_DATABASE_URL";
pub const ENV_BIND_ADDR: &str = "HYRON_BIND_ADDR";
pub const ENV_MAX_CONNECTIONS: &str = "HYRON_DB_MAX_CONNECTIONS";
pub const ENV_ALLOWED_ORIGINS: &str = "HYRON_ALLOWED_ORIGINS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value:?} ({reason})")]
  Invalid {
    var: &'static str,
    value: String,
    reason: String,
  },
}

/// Which origins the CORS layer accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
  Any,
  List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub database_url: String,
  pub bind_addr: SocketAddr,
  pub db_max_connections: u32,
  pub allowed_origins: AllowedOrigins,
}

impl ServerConfig {
  /// Read configuration from the environment; `.env` is loaded by the caller
  pub fn from_env() -> Result<Self, ConfigError> {
    let database_url = env::var(ENV_DATABASE_URL)
      .ok()
      .filter(|v| !v.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let bind_raw = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
      var: ENV_BIND_ADDR,
      value: bind_raw.clone(),
      reason: e.to_string(),
    })?;

    let db_max_connections = match env::var(ENV_MAX_CONNECTIONS) {
      Ok(raw) => match raw.parse::<u32>() {
        Ok(n) if n > 0 => n,
        Ok(_) => {
          return Err(ConfigError::Invalid {
            var: ENV_MAX_CONNECTIONS,
            value: raw,
            reason: "must be at least 1".to_string(),
          })
        }
        Err(e) => {
          return Err(ConfigError::Invalid {
            var: ENV_MAX_CONNECTIONS,
            value: raw,
            reason: e.to_string(),
          })
        }
      },
      Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    let allowed_origins = parse_origins(env::var(ENV_ALLOWED_ORIGINS).ok().as_deref());

    Ok(Self {
      database_url,
      bind_addr,
      db_max_connections,
      allowed_origins,
    })
  }
}

fn parse_origins(raw: Option<&str>) -> AllowedOrigins {
  let origins: Vec<String> = raw
    .unwrap_or("")
    .split(',')
    .map(str::trim)
    .filter(|o| !o.is_empty())
    .map(str::to_string)
    .collect();

  if origins.is_empty() || origins.iter().any(|o| o == "*") {
    AllowedOrigins::Any
  } else {
    AllowedOrigins::List(origins)
  }
}
