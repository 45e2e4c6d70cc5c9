//! Endpoint pool rotation
//!
//! A single [`EndpointRotator`] instance holds a pool of interchangeable
//! endpoints (Solana RPC URLs, Helius API keys) and hands them out round-robin.
//! Callers with a stable identity (Telegram user IDs) lease an endpoint and
//! keep it across requests until they release it, which spreads concurrent
//! users over the pool while keeping each user's traffic on one endpoint.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::core::error::{AppError, AppResult};

/// Round-robin endpoint pool with per-user leases
pub struct EndpointRotator {
    endpoints: Vec<String>,
    state: Mutex<RotatorState>,
}

struct RotatorState {
    /// Cursor for the next round-robin assignment
    next_index: usize,

    /// Active leases keyed by caller identity
    leases: HashMap<i64, usize>,
}

impl EndpointRotator {
    /// Create a rotator over a non-empty endpoint pool
    pub fn new(endpoints: Vec<String>) -> AppResult<Self> {
        if endpoints.is_empty() {
            return Err(AppError::config(
                "Endpoint rotator requires at least one endpoint",
            ));
        }
        Ok(Self {
            endpoints,
            state: Mutex::new(RotatorState {
                next_index: 0,
                leases: HashMap::new(),
            }),
        })
    }

    /// Number of endpoints in the pool
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether the pool holds no endpoints (`new` rejects empty pools)
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Take the next endpoint round-robin, without a lease
    pub fn next(&self) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let index = state.next_index % self.endpoints.len();
        state.next_index = state.next_index.wrapping_add(1);
        self.endpoints[index].clone()
    }

    /// Lease an endpoint for a caller, reusing an existing lease when present
    pub fn lease(&self, user_id: i64) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(&index) = state.leases.get(&user_id) {
            return self.endpoints[index].clone();
        }
        let index = state.next_index % self.endpoints.len();
        state.next_index = state.next_index.wrapping_add(1);
        state.leases.insert(user_id, index);
        debug!(user_id, index, "Leased endpoint");
        self.endpoints[index].clone()
    }

    /// Move a caller's lease to the next endpoint, e.g. after repeated failures
    pub fn rotate(&self, user_id: i64) -> String {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let current = state.leases.get(&user_id).copied().unwrap_or(0);
        let index = (current + 1) % self.endpoints.len();
        state.leases.insert(user_id, index);
        debug!(user_id, index, "Rotated endpoint lease");
        self.endpoints[index].clone()
    }

    /// Release a caller's lease
    pub fn release(&self, user_id: i64) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.leases.remove(&user_id).is_some() {
            debug!(user_id, "Released endpoint lease");
        }
    }

    /// Number of active leases
    pub fn active_leases(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.leases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> EndpointRotator {
        EndpointRotator::new(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(EndpointRotator::new(Vec::new()).is_err());
    }

    #[test]
    fn test_round_robin_wraps() {
        let rotator = pool();
        assert_eq!(rotator.next(), "a");
        assert_eq!(rotator.next(), "b");
        assert_eq!(rotator.next(), "c");
        assert_eq!(rotator.next(), "a");
    }

    #[test]
    fn test_lease_is_stable_per_user() {
        let rotator = pool();
        let first = rotator.lease(100);
        let second = rotator.lease(200);
        assert_ne!(first, second);
        // Repeated calls keep the original assignment
        assert_eq!(rotator.lease(100), first);
        assert_eq!(rotator.lease(200), second);
        assert_eq!(rotator.active_leases(), 2);
    }

    #[test]
    fn test_rotate_advances_lease() {
        let rotator = pool();
        assert_eq!(rotator.lease(7), "a");
        assert_eq!(rotator.rotate(7), "b");
        assert_eq!(rotator.lease(7), "b");
        assert_eq!(rotator.rotate(7), "c");
        assert_eq!(rotator.rotate(7), "a");
    }

    #[test]
    fn test_release_frees_lease() {
        let rotator = pool();
        rotator.lease(1);
        rotator.release(1);
        assert_eq!(rotator.active_leases(), 0);
        // Releasing an unknown user is a no-op
        rotator.release(999);
    }
}
