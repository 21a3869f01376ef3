//! VM networking derived from VLAN memberships.

pub mod interface;

pub use interface::{bridge_id, resolve_vlan, NetworkInterface, ResolveError, ResolvedVlan};
