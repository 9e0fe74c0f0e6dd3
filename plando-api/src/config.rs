/// Configuration management for the API server
///
/// Loads configuration from environment variables (and `.env` in development)
/// into a type-safe struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for token signing, at least 32 characters (required)
/// - `TOKEN_TTL_HOURS`: Token validity window (default: 24)
/// - `REQUEST_TIMEOUT_SECS`: Per-request deadline (default: 60)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use plando_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,

    /// Deadline applied to every request
    pub request_timeout_seconds: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token validity window in hours
    pub ttl_hours: u64,
}

fn parse_or<T>(vars: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match vars(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing or a value does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = vars("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&vars, "API_PORT", 8080u16)?;

        let cors_origins = vars("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = parse_or(&vars, "PRODUCTION", false)?;
        let request_timeout_seconds = parse_or(&vars, "REQUEST_TIMEOUT_SECS", 60u64)?;
        if request_timeout_seconds == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be positive");
        }

        let url = vars("DATABASE_URL").context("DATABASE_URL environment variable is required")?;
        let max_connections = parse_or(&vars, "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let secret = vars("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }
        let ttl_hours = parse_or(&vars, "TOKEN_TTL_HOURS", 24u64)?;
        if ttl_hours == 0 || ttl_hours > 24 * 365 {
            anyhow::bail!("TOKEN_TTL_HOURS must be between 1 and 8760");
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
                request_timeout_seconds,
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            jwt: JwtConfig { secret, ttl_hours },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_seconds)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt.ttl_hours as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/plando"),
            ("JWT_SECRET", SECRET),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert!(!config.api.production);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.token_ttl(), chrono::Duration::hours(24));
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/plando"),
            ("JWT_SECRET", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("PRODUCTION", "true"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("TOKEN_TTL_HOURS", "1"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(
            config.api.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.api.production);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.token_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_required_and_invalid_values() {
        assert!(Config::from_vars(lookup(&[("JWT_SECRET", SECRET)])).is_err());
        assert!(Config::from_vars(lookup(&[("DATABASE_URL", "postgresql://localhost/plando")])).is_err());

        let short_secret = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/plando"),
            ("JWT_SECRET", "short"),
        ]));
        assert!(short_secret.is_err());

        let bad_port = Config::from_vars(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/plando"),
            ("JWT_SECRET", SECRET),
            ("API_PORT", "eighty"),
        ]));
        assert!(bad_port.is_err());
    }
}
