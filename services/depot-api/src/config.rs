use smartdepot_depot::{
    CoordinatorConfig, HoldPolicy, DEFAULT_LOCKOUT_DELAY_MS, DEFAULT_PLANNING_DELAY_MS,
};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub coordinator: CoordinatorConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CoordinatorConfig::default();

        let hold = match lookup("DEPOT_HOLD_POLICY") {
            Some(raw) => parse_hold_policy(&raw)?,
            None => defaults.hold,
        };

        Ok(Config {
            bind_addr: parse_or("BIND_ADDR", &lookup, IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or("PORT", &lookup, DEFAULT_PORT)?,
            coordinator: CoordinatorConfig {
                hold,
                planning_delay: parse_millis_or(
                    "DEPOT_PLANNING_DELAY_MS",
                    &lookup,
                    DEFAULT_PLANNING_DELAY_MS,
                )?,
                lockout_delay: parse_millis_or(
                    "DEPOT_LOCKOUT_DELAY_MS",
                    &lookup,
                    DEFAULT_LOCKOUT_DELAY_MS,
                )?,
                max_tram_index: parse_or(
                    "DEPOT_MAX_TRAM_INDEX",
                    &lookup,
                    defaults.max_tram_index,
                )?,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_hold_policy(raw: &str) -> Result<HoldPolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "synchronous" | "sync" => Ok(HoldPolicy::Synchronous),
        "detached" => Ok(HoldPolicy::Detached),
        _ => Err(ConfigError::InvalidValue {
            key: "DEPOT_HOLD_POLICY",
            value: raw.to_string(),
            reason: "expected `synchronous` or `detached`".to_string(),
        }),
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_millis_or<F>(
    key: &'static str,
    lookup: &F,
    default_ms: u64,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let millis = parse_or(key, lookup, default_ms)?;
    Ok(Duration::from_millis(millis))
}
