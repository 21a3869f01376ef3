//! Interface and route derivation for one VLAN membership.

use crate::design::{CompilerSettings, VlanRow};
use crate::ip::{expand_ip_range, AllocationError, PoolAllocator};
use crate::utils::ip_utils::{
    network_address, strip_prefix_len, with_interface_prefix, INTERFACE_PREFIX_LEN,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A VM network interface as rendered in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub bridge: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gw: Option<String>,
    pub ipaddress: String,
}

impl NetworkInterface {
    /// Interface address without its prefix length
    pub fn address(&self) -> &str {
        strip_prefix_len(&self.ipaddress)
    }
}

/// What one VLAN membership contributes to a VM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVlan {
    pub interface: NetworkInterface,
    pub route: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid VLAN id '{0}'")]
    InvalidVlanId(String),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Bridge id from a sheet VLAN id, tolerating float renderings like `12.0`
pub fn bridge_id(vlan: &VlanRow) -> Result<i64, ResolveError> {
    vlan.vlan_id
        .as_f64()
        .map(|id| id.trunc() as i64)
        .ok_or_else(|| ResolveError::InvalidVlanId(vlan.vlan_id.to_string()))
}

/// Resolve the interface (and optional static route) one VLAN gives a VM.
///
/// Returns `Ok(None)` when the VLAN has no usable address pool. All state
/// lives in `allocator`; this function keeps none of its own.
pub fn resolve_vlan(
    scope: &str,
    vlan: &VlanRow,
    allocator: &mut PoolAllocator,
    settings: &CompilerSettings,
) -> Result<Option<ResolvedVlan>, ResolveError> {
    let Some(spec) = vlan.pool_spec() else {
        debug!("No IP column found for {}", scope);
        return Ok(None);
    };

    let pool = expand_ip_range(spec);
    if pool.is_empty() {
        warn!("Empty IP pool for {} ('{}')", scope, spec);
        return Ok(None);
    }

    let id = bridge_id(vlan)?.to_string();
    let bridge = format!("{}{}", settings.bridge_prefix, id);
    let ip = allocator.allocate(scope, &id, &pool)?;

    let route = match (&vlan.other_vlans_gw, &vlan.subnet) {
        (Some(other_gw), Some(subnet)) if vlan.launch_gw.as_ref() != Some(other_gw) => {
            match network_address(subnet) {
                Ok(network) => Some(format!(
                    "{}/{} via {} dev {}",
                    network, INTERFACE_PREFIX_LEN, other_gw, bridge
                )),
                Err(e) => {
                    warn!("Error creating route for {} via subnet '{}': {}", ip, subnet, e);
                    None
                }
            }
        }
        _ => None,
    };

    let interface = NetworkInterface {
        bridge,
        gw: vlan.launch_gw.clone(),
        ipaddress: with_interface_prefix(&ip),
    };

    Ok(Some(ResolvedVlan { interface, route }))
}
