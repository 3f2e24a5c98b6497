// src/config/models.rs
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Settings that are wrong regardless of the backend list. Backends are
/// checked when the registry is built from them.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("backend timeout must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,

    pub backends: Vec<BackendConfig>,
}

/// One `backends` entry. The weight is signed so that zero and negative values
/// reach registry validation instead of failing deserialization.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub address: String,
    pub weight: i64,
}

impl Config {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.backend_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9000))
}

fn default_backend_timeout_secs() -> u64 {
    5
}
