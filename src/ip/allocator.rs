//! Round-robin address allocation.
//!
//! Each (VLAN set, bridge) pair owns a counter that starts at zero and
//! advances once per allocation. The counter indexes into the pool modulo
//! its length, so pools smaller than the number of VMs wrap around and the
//! sequence is the same on every run.

use std::collections::HashMap;

/// Allocation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("Empty IP pool for {scope}/{bridge}")]
    EmptyPool { scope: String, bridge: String },
}

/// Per-run allocation state, one counter per (scope, bridge) key.
#[derive(Debug, Default)]
pub struct PoolAllocator {
    counters: HashMap<(String, String), usize>,
}

impl PoolAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next address of `pool` for this scope and bridge.
    ///
    /// An empty pool is an error and leaves the counter untouched.
    pub fn allocate(
        &mut self,
        scope: &str,
        bridge: &str,
        pool: &[String],
    ) -> Result<String, AllocationError> {
        if pool.is_empty() {
            return Err(AllocationError::EmptyPool {
                scope: scope.to_string(),
                bridge: bridge.to_string(),
            });
        }

        let counter = self
            .counters
            .entry((scope.to_string(), bridge.to_string()))
            .or_insert(0);
        let ip = pool[*counter % pool.len()].clone();
        *counter += 1;

        log::debug!("Allocated IP {} for {}/{}", ip, scope, bridge);
        Ok(ip)
    }

    /// Number of allocations made so far for a key
    pub fn allocations(&self, scope: &str, bridge: &str) -> usize {
        self.counters
            .get(&(scope.to_string(), bridge.to_string()))
            .copied()
            .unwrap_or(0)
    }
}
