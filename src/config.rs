// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment exactly once, at startup, into a
//! [`Config`] value. Components receive the parts they need from it; nothing
//! below `main` reads the process environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DATA_DIR` | Directory holding the embedded document store | `./data` |
//! | `JWT_SECRET` | HMAC secret used to sign bearer tokens | `rwabridge-jwt-secret-key` |
//! | `JWT_LIFETIME` | Token validity (`30d`, `12h`, `15m`, `90s` or seconds) | `30d` |
//! | `SIMULATED_LATENCY` | Whether mock blockchain calls sleep | `true` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{
    collections::HashMap,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_LIFETIME_ENV: &str = "JWT_LIFETIME";
pub const SIMULATED_LATENCY_ENV: &str = "SIMULATED_LATENCY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Fallback signing secret. Only suitable for local development.
pub const DEFAULT_JWT_SECRET: &str = "rwabridge-jwt-secret-key";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_JWT_LIFETIME: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Database file name inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "rwabridge.redb";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} must be a duration like 30d, 12h, 15m, 90s or 3600, got {value:?}")]
    InvalidDuration { name: &'static str, value: String },

    #[error("{name} must be true or false, got {value:?}")]
    InvalidBool { name: &'static str, value: String },

    #[error("{name} must be json or pretty, got {value:?}")]
    InvalidLogFormat { name: &'static str, value: String },

    #[error("invalid bind address {0}")]
    InvalidBindAddress(String),
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Token signing settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub lifetime: Duration,
    /// True when `JWT_SECRET` was not set and the fallback is in use.
    pub using_default_secret: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            lifetime: DEFAULT_JWT_LIFETIME,
            using_default_secret: true,
        }
    }
}

/// Process-wide configuration, constructed once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt: JwtConfig,
    pub simulated_latency: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            jwt: JwtConfig::default(),
            simulated_latency: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let port = match get(PORT_ENV) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                name: PORT_ENV,
                value: value.to_string(),
            })?,
            None => defaults.port,
        };

        let lifetime = match get(JWT_LIFETIME_ENV) {
            Some(value) => parse_duration(value).ok_or_else(|| ConfigError::InvalidDuration {
                name: JWT_LIFETIME_ENV,
                value: value.to_string(),
            })?,
            None => DEFAULT_JWT_LIFETIME,
        };

        let simulated_latency = match get(SIMULATED_LATENCY_ENV) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        name: SIMULATED_LATENCY_ENV,
                        value: value.to_string(),
                    })
                }
            },
            None => defaults.simulated_latency,
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::InvalidLogFormat {
                        name: LOG_FORMAT_ENV,
                        value: value.to_string(),
                    })
                }
            },
            None => defaults.log_format,
        };

        let jwt = match get(JWT_SECRET_ENV) {
            Some(secret) => JwtConfig {
                secret: secret.to_string(),
                lifetime,
                using_default_secret: false,
            },
            None => JwtConfig {
                lifetime,
                ..JwtConfig::default()
            },
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or(DEFAULT_HOST).to_string(),
            port,
            data_dir: get(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            jwt,
            simulated_latency,
            log_format,
        })
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| ConfigError::InvalidBindAddress(addr))
    }

    /// Path of the redb database file.
    pub fn database_path(&self) -> PathBuf {
        database_path_in(&self.data_dir)
    }
}

pub fn database_path_in(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}

/// Parse `30d`, `12h`, `15m`, `90s` or a bare number of seconds.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (digits, unit_secs) = match value.chars().last()? {
        'd' => (&value[..value.len() - 1], 24 * 60 * 60),
        'h' => (&value[..value.len() - 1], 60 * 60),
        'm' => (&value[..value.len() - 1], 60),
        's' => (&value[..value.len() - 1], 1),
        c if c.is_ascii_digit() => (value, 1),
        _ => return None,
    };
    let amount: u64 = digits.trim().parse().ok()?;
    if amount == 0 {
        return None;
    }
    amount.checked_mul(unit_secs).map(Duration::from_secs)
}
