//! Process configuration from environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use stockmaster_observability::LogFormat;
use stockmaster_scanning::log::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres URL; `None` selects the in-memory backend.
    pub database_url: Option<String>,
    /// Seed demo catalog and stock (in-memory backend only).
    pub seed_demo: bool,
    pub log_format: LogFormat,
    /// Default scan history page size, at most `MAX_HISTORY_LIMIT`.
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            database_url: None,
            seed_demo: true,
            log_format: LogFormat::Json,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl AppConfig {
    /// In-memory, demo-seeded configuration on an ephemeral localhost port.
    pub fn for_tests() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_format: LogFormat::Pretty,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(v) = lookup("STOCKMASTER_BIND_ADDR") {
            cfg.bind_addr = v.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "STOCKMASTER_BIND_ADDR",
                value: v.clone(),
                reason: e.to_string(),
            })?;
        }

        cfg.database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        if let Some(v) = lookup("STOCKMASTER_SEED_DEMO") {
            cfg.seed_demo = parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                var: "STOCKMASTER_SEED_DEMO",
                value: v.clone(),
                reason: "expected true or false".to_string(),
            })?;
        }

        if let Some(v) = lookup("STOCKMASTER_LOG_FORMAT") {
            cfg.log_format = v.parse().map_err(|e: stockmaster_observability::UnknownLogFormat| {
                ConfigError::Invalid {
                    var: "STOCKMASTER_LOG_FORMAT",
                    value: v.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(v) = lookup("STOCKMASTER_HISTORY_LIMIT") {
            let limit: usize =
                v.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                        var: "STOCKMASTER_HISTORY_LIMIT",
                        value: v.clone(),
                        reason: e.to_string(),
                    })?;
            cfg.history_limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        }

        Ok(cfg)
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let cfg = from(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(cfg.database_url.is_none());
        assert!(cfg.seed_demo);
        assert_eq!(cfg.history_limit, 100);
    }

    #[test]
    fn history_limit_is_clamped() {
        let cfg = from(&[("STOCKMASTER_HISTORY_LIMIT", "50000")]).unwrap();
        assert_eq!(cfg.history_limit, 1000);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = from(&[("STOCKMASTER_SEED_DEMO", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("STOCKMASTER_SEED_DEMO"));
        assert!(from(&[("STOCKMASTER_BIND_ADDR", "nowhere")]).is_err());
        assert!(from(&[("STOCKMASTER_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let cfg = from(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(cfg.database_url.is_none());
    }
}
