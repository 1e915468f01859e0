//! Process configuration read from the environment at startup.
//!
//! Malformed values abort startup; absent values fall back to defaults
//! suitable for local development. `JWT_SECRET` has no default.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long the exchange mailer may drain after the listener closes.
    pub shutdown_timeout_secs: u64,
    /// Buffered marketplace events per subscriber before the slowest lags.
    pub event_bus_capacity: usize,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                    |
    /// | `EVENT_BUS_CAPACITY`    | `256`                   |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but does not parse, or if the JWT
    /// configuration is incomplete.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 10),
            event_bus_capacity: env_or("EVENT_BUS_CAPACITY", 256),
            jwt: JwtConfig::from_env(),
        }
    }

    /// The socket address the listener binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Read and parse `key`, or return `default` when it is unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
