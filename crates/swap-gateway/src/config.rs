//! Gateway configuration.
//!
//! Small enough to live in one struct: where to listen and how long a
//! request may run before the timeout middleware cuts it off.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Environment variable overriding the bind address.
pub const LISTEN_ADDR_VAR: &str = "SLOTSWAP_LISTEN_ADDR";
/// Environment variable overriding the request timeout, in milliseconds.
pub const REQUEST_TIMEOUT_VAR: &str = "SLOTSWAP_REQUEST_TIMEOUT_MS";

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (default `127.0.0.1:4000`).
    pub listen_addr: SocketAddr,
    /// Per-request deadline enforced by the timeout middleware.
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4000),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    /// Defaults overridden by `SLOTSWAP_LISTEN_ADDR` and
    /// `SLOTSWAP_REQUEST_TIMEOUT_MS` where set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = env::var(LISTEN_ADDR_VAR) {
            config.listen_addr = raw
                .parse()
                .map_err(|_| ConfigError::InvalidListenAddr(raw))?;
        }
        if let Ok(raw) = env::var(REQUEST_TIMEOUT_VAR) {
            let ms = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw))?;
            config.request_timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Validate configuration before binding.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.port() == 0 {
            return Err(ConfigError::InvalidListenAddr(
                "port cannot be 0".into(),
            ));
        }
        if self.request_timeout.as_millis() == 0 {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Unparseable listen address or unusable port.
    #[error("invalid listen address: {0}")]
    InvalidListenAddr(String),
    /// Unparseable or zero timeout.
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}
