// src/load_balancer/weighted.rs
use crate::load_balancer::{Backend, BackendRegistry, ConfigError, LoadBalancer};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Weighted round robin over a fixed registry.
///
/// Cursor positions `0..total_weight` are split into contiguous buckets in
/// registry order, one bucket of `weight` positions per backend. With
/// `[(A, 2), (B, 1), (C, 2)]` the cycle is `A, A, B, C, C`.
#[derive(Debug)]
pub struct WeightedSelector {
    registry: BackendRegistry,
    position: AtomicUsize,
}

impl WeightedSelector {
    pub fn new(registry: BackendRegistry) -> Result<Self, ConfigError> {
        if registry.total_weight() == 0 {
            return Err(ConfigError::ZeroTotalWeight);
        }

        Ok(Self {
            registry,
            position: AtomicUsize::new(0),
        })
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn next_backend(&self) -> &Backend {
        let position = self.advance();
        self.bucket(position)
    }

    /// Returns the current position and moves the cursor one step, wrapping at
    /// the total weight. Concurrent callers never observe the same position.
    fn advance(&self) -> usize {
        let total = self.registry.total_weight();
        match self
            .position
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| Some((p + 1) % total))
        {
            Ok(previous) | Err(previous) => previous,
        }
    }

    fn bucket(&self, position: usize) -> &Backend {
        let backends = self.registry.backends();
        let mut cnt = 0;
        for backend in backends {
            cnt += backend.weight();
            if position < cnt {
                return backend;
            }
        }

        debug_assert!(
            false,
            "position {position} outside total weight {}",
            self.registry.total_weight()
        );
        tracing::error!(
            position,
            total_weight = self.registry.total_weight(),
            "weighted selection fell through, using first backend"
        );
        &backends[0]
    }
}

impl LoadBalancer for WeightedSelector {
    fn next_backend(&self) -> &Backend {
        WeightedSelector::next_backend(self)
    }

    fn name(&self) -> &'static str {
        "weighted_round_robin"
    }
}
