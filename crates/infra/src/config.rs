//! Process configuration read from environment variables.

use std::env;
use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use partstock_observability::LogFormat;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Set when `JWT_SECRET` was absent and the dev secret is in use.
    pub jwt_secret_defaulted: bool,
    pub jwt_ttl: Duration,
    pub seed_demo_data: bool,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_secret_defaulted: true,
            jwt_ttl: Duration::minutes(480),
            seed_demo_data: true,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = match var("BIND_ADDR") {
            Some(v) => v
                .trim()
                .parse::<SocketAddr>()
                .map_err(|e| ConfigError::invalid("BIND_ADDR", &v, e.to_string()))?,
            None => defaults.bind_addr,
        };

        let (jwt_secret, jwt_secret_defaulted) = match var("JWT_SECRET") {
            Some(v) => (v, false),
            None => (defaults.jwt_secret.clone(), true),
        };

        let jwt_ttl = match var("JWT_TTL_MINUTES") {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(0) => return Err(ConfigError::invalid("JWT_TTL_MINUTES", &v, "must be positive")),
                Ok(minutes) => Duration::minutes(minutes.into()),
                Err(e) => return Err(ConfigError::invalid("JWT_TTL_MINUTES", &v, e.to_string())),
            },
            None => defaults.jwt_ttl,
        };

        let seed_demo_data = match var("SEED_DEMO_DATA") {
            Some(v) => parse_flag(&v)
                .ok_or_else(|| ConfigError::invalid("SEED_DEMO_DATA", &v, "expected true or false"))?,
            None => defaults.seed_demo_data,
        };

        let cors_allowed_origins = match var("CORS_ALLOWED_ORIGINS") {
            Some(v) => v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.cors_allowed_origins,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(v) => v
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid("LOG_FORMAT", &v, e.to_string()))?,
            None => defaults.log_format,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_secret_defaulted,
            jwt_ttl,
            seed_demo_data,
            cors_allowed_origins,
            log_format,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
