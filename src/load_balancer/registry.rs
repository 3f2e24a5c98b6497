// src/load_balancer/registry.rs
use std::collections::HashSet;
use url::Url;

use crate::config::BackendConfig;

/// Errors raised while turning configuration into a usable registry or selector.
/// All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("backend list is empty")]
    EmptyBackends,

    #[error("backend address must not be empty")]
    EmptyAddress,

    #[error("invalid backend address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("duplicate backend address {0:?}")]
    DuplicateAddress(String),

    #[error("backend {address} has non-positive weight {weight}")]
    NonPositiveWeight { address: String, weight: i64 },

    #[error("sum of backend weights overflows")]
    WeightOverflow,

    #[error("total backend weight is zero")]
    ZeroTotalWeight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    address: String,
    weight: usize,
    url: Url,
}

impl Backend {
    fn new(address: String, weight: i64) -> Result<Self, ConfigError> {
        if address.is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if weight <= 0 {
            return Err(ConfigError::NonPositiveWeight { address, weight });
        }
        let weight = usize::try_from(weight).map_err(|_| ConfigError::WeightOverflow)?;
        let url = root_url(&address)?;

        Ok(Self { address, weight, url })
    }

    /// `host:port` as configured.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn weight(&self) -> usize {
        self.weight
    }

    /// Root URL the proxy sends its GET to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

// The address has to be a bare authority, anything after it would silently
// change the request target.
fn root_url(address: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    if address.contains(['/', '?', '#', '@']) || address.contains(char::is_whitespace) {
        return Err(invalid("expected host:port"));
    }
    // Url fills in :80 for a missing or empty port, so check the raw text.
    match address.rsplit_once(':') {
        Some((_, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {}
        _ => return Err(invalid("missing port")),
    }

    let url = Url::parse(&format!("http://{address}/")).map_err(|e| invalid(&e.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }

    Ok(url)
}

/// Ordered, immutable list of backends with their precomputed total weight.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Vec<Backend>,
    total_weight: usize,
}

impl BackendRegistry {
    pub fn new<I, A>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (A, i64)>,
        A: Into<String>,
    {
        let mut backends = Vec::new();
        let mut seen = HashSet::new();
        let mut total_weight: usize = 0;

        for (address, weight) in entries {
            let backend = Backend::new(address.into(), weight)?;
            if !seen.insert(backend.address.clone()) {
                return Err(ConfigError::DuplicateAddress(backend.address));
            }
            total_weight = total_weight
                .checked_add(backend.weight)
                .ok_or(ConfigError::WeightOverflow)?;
            backends.push(backend);
        }

        if backends.is_empty() {
            return Err(ConfigError::EmptyBackends);
        }

        Ok(Self {
            backends,
            total_weight,
        })
    }

    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    pub fn total_weight(&self) -> usize {
        self.total_weight
    }
}

impl TryFrom<&[BackendConfig]> for BackendRegistry {
    type Error = ConfigError;

    fn try_from(configs: &[BackendConfig]) -> Result<Self, Self::Error> {
        Self::new(configs.iter().map(|c| (c.address.clone(), c.weight)))
    }
}
