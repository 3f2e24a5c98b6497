// src/load_balancer/algorithm.rs
use crate::load_balancer::Backend;

/// Picks the backend for the next request. Implementations are shared by every
/// connection task, so any cursor they keep must be advanced atomically.
pub trait LoadBalancer: Send + Sync {
    fn next_backend(&self) -> &Backend;

    fn name(&self) -> &'static str;
}
