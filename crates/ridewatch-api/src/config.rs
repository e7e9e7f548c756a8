//! Server configuration from environment variables.
//!
//! | Variable                 | Default        |
//! |--------------------------|----------------|
//! | `DATABASE_URL`           | required       |
//! | `HOST`                   | `0.0.0.0`      |
//! | `PORT`                   | `3000`         |
//! | `JWT_SECRET`             | required, ≥ 32 bytes |
//! | `TOKEN_TTL_SECS`         | `86400`, at most one year |
//! | `FILE_STORAGE_PATH`      | `./uploads`    |
//! | `MAX_UPLOAD_BYTES`       | `10485760`     |
//! | `RATE_LIMIT_ENABLED`     | `true`         |
//! | `RATE_LIMIT_REQUESTS`    | `100`          |
//! | `RATE_LIMIT_PERIOD_SECS` | `60`           |
//! | `ALLOWED_ORIGINS`        | `http://localhost:3000` |
//! | `DB_MAX_CONNECTIONS`     | `10`           |

use std::collections::HashMap;
use std::path::PathBuf;

use axum::http::HeaderValue;
use ridewatch_auth::{MAX_TOKEN_TTL_SECS, MIN_SECRET_LENGTH};
use ridewatch_core::defaults::DEFAULT_TOKEN_TTL_SECS;
use ridewatch_core::{Error, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FILE_STORAGE_PATH: &str = "./uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 100;
pub const DEFAULT_RATE_LIMIT_PERIOD_SECS: u64 = 60;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests: u32,
    pub period_secs: u64,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub file_storage_path: PathBuf,
    pub max_upload_bytes: usize,
    pub rate_limit: RateLimitConfig,
    pub allowed_origins: Vec<HeaderValue>,
    pub db_max_connections: u32,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("file_storage_path", &self.file_storage_path)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("rate_limit", &self.rate_limit)
            .field("allowed_origins", &self.allowed_origins)
            .field("db_max_connections", &self.db_max_connections)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: std::str::FromStr>(vars: &HashMap<String, String>, key: &str, default: T) -> Result<T> {
    match vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: '{}'", key, raw))),
        None => Ok(default),
    }
}

fn parse_flag(vars: &HashMap<String, String>, key: &str, default: bool) -> bool {
    vars.get(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

/// Split a comma-separated origin list, skipping entries that are not valid
/// header values.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_kv(std::env::vars().collect())
    }

    /// Build from an explicit key/value map.
    pub fn from_kv(vars: HashMap<String, String>) -> Result<Self> {
        let database_url = vars
            .get("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .ok_or_else(|| Error::Config("DATABASE_URL is required".to_string()))?;

        let jwt_secret = vars
            .get("JWT_SECRET")
            .cloned()
            .ok_or_else(|| Error::Config("JWT_SECRET is required".to_string()))?;
        if jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(Error::Config(format!(
                "JWT_SECRET must be at least {} bytes",
                MIN_SECRET_LENGTH
            )));
        }

        let token_ttl_secs = parse_or(&vars, "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&token_ttl_secs) {
            return Err(Error::Config(format!(
                "TOKEN_TTL_SECS must be between 1 and {}",
                MAX_TOKEN_TTL_SECS
            )));
        }

        let rate_limit = RateLimitConfig {
            enabled: parse_flag(&vars, "RATE_LIMIT_ENABLED", true),
            requests: parse_or(&vars, "RATE_LIMIT_REQUESTS", DEFAULT_RATE_LIMIT_REQUESTS)?,
            period_secs: parse_or(&vars, "RATE_LIMIT_PERIOD_SECS", DEFAULT_RATE_LIMIT_PERIOD_SECS)?,
        };

        let origins_raw = vars
            .get("ALLOWED_ORIGINS")
            .filter(|v| !v.trim().is_empty())
            .map(String::as_str)
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS);

        Ok(Self {
            database_url,
            host: vars
                .get("HOST")
                .cloned()
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&vars, "PORT", DEFAULT_PORT)?,
            jwt_secret,
            token_ttl_secs,
            file_storage_path: PathBuf::from(
                vars.get("FILE_STORAGE_PATH")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_FILE_STORAGE_PATH),
            ),
            max_upload_bytes: parse_or(&vars, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            rate_limit,
            allowed_origins: parse_allowed_origins(origins_raw),
            db_max_connections: parse_or(&vars, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn base() -> HashMap<String, String> {
        HashMap::from([
            ("DATABASE_URL".to_string(), "postgres://localhost/ridewatch".to_string()),
            ("JWT_SECRET".to_string(), SECRET.to_string()),
        ])
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_kv(base()).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.token_ttl_secs, 86400);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.requests, 100);
        assert_eq!(config.rate_limit.period_secs, 60);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.file_storage_path, PathBuf::from("./uploads"));
        assert_eq!(config.allowed_origins.len(), 1);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let mut vars = base();
        vars.remove("JWT_SECRET");
        assert!(matches!(ServerConfig::from_kv(vars), Err(Error::Config(_))));
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut vars = base();
        vars.insert("JWT_SECRET".to_string(), "short".to_string());
        assert!(matches!(ServerConfig::from_kv(vars), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_database_url_rejected() {
        let mut vars = base();
        vars.remove("DATABASE_URL");
        assert!(ServerConfig::from_kv(vars).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut vars = base();
        vars.insert("PORT".to_string(), "8080".to_string());
        vars.insert("RATE_LIMIT_ENABLED".to_string(), "false".to_string());
        vars.insert("TOKEN_TTL_SECS".to_string(), "600".to_string());
        vars.insert(
            "ALLOWED_ORIGINS".to_string(),
            "https://a.example, ,https://b.example".to_string(),
        );
        let config = ServerConfig::from_kv(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.token_ttl_secs, 600);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let mut vars = base();
        vars.insert("PORT".to_string(), "eighty".to_string());
        assert!(matches!(ServerConfig::from_kv(vars), Err(Error::Config(_))));
    }

    #[test]
    fn test_token_ttl_out_of_range_rejected() {
        for ttl in ["0", "9000000000000", "10000000000000000"] {
            let mut vars = base();
            vars.insert("TOKEN_TTL_SECS".to_string(), ttl.to_string());
            assert!(
                matches!(ServerConfig::from_kv(vars), Err(Error::Config(_))),
                "ttl {}",
                ttl
            );
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig::from_kv(base()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(SECRET));
        assert!(!debug.contains("postgres://"));
    }
}
