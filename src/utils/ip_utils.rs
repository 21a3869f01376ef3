//! IP utility functions for validation and manipulation

use ipnetwork::{IpNetworkError, Ipv4Network};
use std::net::{IpAddr, Ipv4Addr};

/// Prefix length every VM interface is rendered with
pub const INTERFACE_PREFIX_LEN: u8 = 24;

/// Check if a string is a valid IP address (IPv4 or IPv6)
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// Render an address with the fixed interface prefix length
pub fn with_interface_prefix(ip: &str) -> String {
    format!("{}/{}", ip, INTERFACE_PREFIX_LEN)
}

/// Address part of a CIDR string (`"10.0.0.1/24"` -> `"10.0.0.1"`)
pub fn strip_prefix_len(cidr: &str) -> &str {
    cidr.split('/').next().unwrap_or(cidr)
}

/// Network address of a subnet, tolerating host bits (`10.1.2.7/22` -> `10.1.0.0`).
///
/// A bare address is treated as a /32 network.
pub fn network_address(subnet: &str) -> Result<Ipv4Addr, IpNetworkError> {
    let network: Ipv4Network = subnet.trim().parse()?;
    Ok(network.network())
}
