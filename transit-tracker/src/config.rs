//! Server configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::tracking::TrackerConfig;

const DEFAULT_PORT: u16 = 5000;

/// Errors reading configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },

    #[error("BIND_ADDR is not an IP address: {0:?}")]
    InvalidBindAddr(String),
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TriMet application id. Empty when unset.
    pub app_id: String,

    pub bind_addr: SocketAddr,

    pub tracker: TrackerConfig,

    /// Serve TriMet data from this directory instead of the live API.
    pub mock_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let app_id = var("TRIMET_APP_ID")
            .or_else(|| var("TRIMET_API_KEY"))
            .unwrap_or_default();

        let port = match var("PORT") {
            Some(value) => parse_number::<u16>("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        let ip = match var("BIND_ADDR") {
            Some(value) => value
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBindAddr(value))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let mut tracker = TrackerConfig::default();
        if let Some(value) = var("POLL_INTERVAL_SECS") {
            tracker = tracker.with_poll_interval(parse_secs("POLL_INTERVAL_SECS", &value)?);
        }
        if let Some(value) = var("FETCH_TIMEOUT_SECS") {
            tracker = tracker.with_fetch_timeout(parse_secs("FETCH_TIMEOUT_SECS", &value)?);
        }

        Ok(Self {
            app_id,
            bind_addr: SocketAddr::new(ip, port),
            tracker,
            mock_dir: var("TRIMET_MOCK_DIR").map(PathBuf::from),
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}

fn parse_secs(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match parse_number::<u64>(name, value)? {
        0 => Err(ConfigError::Zero { name }),
        secs => Ok(Duration::from_secs(secs)),
    }
}
