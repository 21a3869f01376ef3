//! Inventory model and assembly.
//!
//! [`types`] holds the output document; [`assembler`] drives the IP
//! allocator, the VLAN resolver and the resource resolver to fill it.

pub mod assembler;
pub mod types;

pub use assembler::{build_global_vars, compile_inventory, InventoryCompiler};
pub use types::{HostRecord, Inventory, InventoryGroup, InventoryRoot, VmRecord};
