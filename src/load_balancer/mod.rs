// src/load_balancer/mod.rs
mod algorithm;
mod registry;
mod weighted;

pub use algorithm::LoadBalancer; // trait
pub use registry::{Backend, BackendRegistry, ConfigError};
pub use weighted::WeightedSelector;

use crate::config::Config;
use std::sync::Arc;

/// Builds the shared selector from a loaded configuration.
pub fn create_load_balancer(config: &Config) -> Result<Arc<dyn LoadBalancer>, ConfigError> {
    let registry = BackendRegistry::try_from(config.backends.as_slice())?;
    let selector = WeightedSelector::new(registry)?;

    tracing::info!(
        algorithm = selector.name(),
        backends = selector.registry().backends().len(),
        total_weight = selector.registry().total_weight(),
        "load balancer ready"
    );

    Ok(Arc::new(selector))
}
