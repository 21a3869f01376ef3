//! IP address pool handling.
//!
//! This module expands pool specifications from the VLAN sheet into
//! concrete address lists and hands addresses out round-robin per
//! VLAN set and bridge.

pub mod allocator;
pub mod range;

// Re-export commonly used types
pub use allocator::{AllocationError, PoolAllocator};
pub use range::expand_ip_range;
