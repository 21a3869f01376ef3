//! Shared utilities: IP helpers.

pub mod ip_utils;

pub use ip_utils::{is_valid_ip, network_address, strip_prefix_len, with_interface_prefix};
