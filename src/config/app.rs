//! Application configuration loaded from environment variables.
//!
//! In production (`ENV=production`) the store URL, the token secret and the
//! CORS allow-list must be set explicitly. Otherwise permissive development
//! defaults are used and a warning is logged for each one.

use std::{path::PathBuf, str::FromStr, time::Duration};

use tracing::warn;

use super::database::{DEFAULT_DATABASE_URL, DatabaseSettings};
use crate::errors::{Error, Result};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";
const DEV_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5000";

/// Deployment mode selected by `ENV`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Permissive defaults for local work
    Development,
    /// Secrets and origins must be set explicitly
    Production,
}

/// Account created at startup when `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSeed {
    /// Login email
    pub email: String,
    /// Plain-text password, hashed on registration
    pub password: String,
}

/// Everything the server needs to start.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Deployment mode
    pub environment: Environment,
    /// Connection pool settings
    pub database: DatabaseSettings,
    /// HS256 signing secret
    pub jwt_secret: String,
    /// CORS allow-list
    pub allowed_origins: Vec<String>,
    /// Listen port
    pub port: u16,
    /// Per-request deadline
    pub request_timeout: Duration,
    /// Gate `/api/admin/*` behind bearer tokens
    pub admin_auth_required: bool,
    /// Admin account to create at startup
    pub admin_seed: Option<AdminSeed>,
    /// TOML file holding a default lixi configuration
    pub seed_file: PathBuf,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = match get("ENV").as_deref() {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        };

        let required = |key: &str, dev_default: &str| -> Result<String> {
            match get(key) {
                Some(value) => Ok(value),
                None if environment == Environment::Production => Err(Error::Config {
                    message: format!("{key} environment variable is required in production"),
                }),
                None => {
                    warn!("{key} not set, using development default");
                    Ok(dev_default.to_string())
                }
            }
        };

        let database = DatabaseSettings {
            url: required("DATABASE_URL", DEFAULT_DATABASE_URL)?,
            max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_or(&get, "DB_MIN_CONNECTIONS", 2)?,
            max_lifetime: Duration::from_secs(parse_or(&get, "DB_MAX_LIFETIME_SECS", 3600)?),
            idle_timeout: Duration::from_secs(parse_or(&get, "DB_IDLE_TIMEOUT_SECS", 1800)?),
            ..DatabaseSettings::default()
        };
        if database.min_connections > database.max_connections {
            return Err(Error::Config {
                message: "DB_MIN_CONNECTIONS cannot exceed DB_MAX_CONNECTIONS".to_string(),
            });
        }

        let jwt_secret = required("JWT_SECRET", DEV_JWT_SECRET)?;
        let allowed_origins = parse_origins(&required("ALLOWED_ORIGINS", DEV_ALLOWED_ORIGINS)?);

        let admin_seed = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };

        Ok(Self {
            environment,
            database,
            jwt_secret,
            allowed_origins,
            port: parse_or(&get, "PORT", 8080)?,
            request_timeout: Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?),
            admin_auth_required: parse_or(&get, "ADMIN_AUTH_REQUIRED", false)?,
            admin_seed,
            seed_file: get("LIXI_SEED_FILE").map_or_else(|| PathBuf::from("lixi.toml"), PathBuf::from),
        })
    }
}

fn parse_or<T, F>(get: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    get(key).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e| Error::Config {
            message: format!("invalid value for {key}: {e}"),
        })
    })
}

/// Splits a comma-separated origin list, dropping blanks.
#[must_use]
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_development_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:5000"]
        );
        assert_eq!(config.port, 8080);
        assert!(!config.admin_auth_required);
        assert!(config.admin_seed.is_none());
    }

    #[test]
    fn test_production_requires_secrets() {
        let result = AppConfig::from_lookup(lookup(&[
            ("ENV", "production"),
            ("DATABASE_URL", "postgres://db/lixi"),
            ("ALLOWED_ORIGINS", "https://lixi.example.com"),
        ]));
        assert!(matches!(result, Err(Error::Config { message }) if message.contains("JWT_SECRET")));
    }

    #[test]
    fn test_production_config() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ENV", "production"),
            ("DATABASE_URL", "postgres://db/lixi"),
            ("JWT_SECRET", "s3cret"),
            ("ALLOWED_ORIGINS", " https://a.example.com , ,https://b.example.com"),
            ("PORT", "9000"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("ADMIN_AUTH_REQUIRED", "true"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "12345678@X"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
        assert_eq!(config.port, 9000);
        assert!(config.admin_auth_required);
        assert_eq!(config.admin_seed.unwrap().email, "admin@example.com");
    }

    #[test]
    fn test_invalid_number() {
        let result = AppConfig::from_lookup(lookup(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
