//! Address pool range expansion.
//!
//! Pools are written in the design sheet as comma-separated tokens, each
//! either a bare address or a last-octet range such as `10.225.26.10-12`.

use crate::utils::ip_utils::is_valid_ip;
use log::warn;
use regex::Regex;
use std::sync::LazyLock;

static RANGE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.\d+\.\d+)\.(\d+)-(\d+)$").expect("Invalid range token regex")
});

/// Expand a pool specification into individual addresses.
///
/// Order and duplicates are kept as written; ranges expand ascending with
/// both bounds inclusive. Malformed tokens are skipped with a warning, so
/// this never fails and returns an empty list for blank input.
///
/// # Examples
/// ```
/// use vmlaunch_inventory::ip::expand_ip_range;
///
/// assert_eq!(
///     expand_ip_range("10.0.0.1-3,10.0.0.10"),
///     vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.10"],
/// );
/// assert!(expand_ip_range("  ").is_empty());
/// ```
pub fn expand_ip_range(spec: &str) -> Vec<String> {
    let mut ips = Vec::new();

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.contains('-') {
            match expand_range_token(token) {
                Some(range) => ips.extend(range),
                None => warn!("Skipping malformed IP range '{}'", token),
            }
        } else if is_valid_ip(token) {
            ips.push(token.to_string());
        } else {
            warn!("Invalid IP skipped: {}", token);
        }
    }

    ips
}

/// Expand one `a.b.c.start-end` token, or `None` if it is malformed.
fn expand_range_token(token: &str) -> Option<Vec<String>> {
    let caps = RANGE_TOKEN.captures(token)?;
    let prefix = &caps[1];
    let start: u8 = caps[2].parse().ok()?;
    let end: u8 = caps[3].parse().ok()?;

    if start > end {
        warn!("IP range '{}' is descending and expands to nothing", token);
        return Some(Vec::new());
    }

    let range: Vec<String> = (start..=end).map(|octet| format!("{}.{}", prefix, octet)).collect();
    // The prefix octets are only checked for shape by the pattern
    if range.iter().all(|ip| is_valid_ip(ip)) {
        Some(range)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ranges_and_singles() {
        assert_eq!(
            expand_ip_range("10.0.0.1-3,10.0.0.10"),
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.10"]
        );
        assert_eq!(
            expand_ip_range("10.225.26.166-167, 10.225.26.186-187"),
            vec!["10.225.26.166", "10.225.26.167", "10.225.26.186", "10.225.26.187"]
        );
    }

    #[test]
    fn test_blank_input() {
        assert!(expand_ip_range("").is_empty());
        assert!(expand_ip_range("   ").is_empty());
        assert!(expand_ip_range(" , ,").is_empty());
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        assert_eq!(
            expand_ip_range("10.0.0.5,10.0.0.1,10.0.0.5"),
            vec!["10.0.0.5", "10.0.0.1", "10.0.0.5"]
        );
    }

    #[test]
    fn test_single_address_range() {
        assert_eq!(expand_ip_range("10.0.0.7-7"), vec!["10.0.0.7"]);
    }

    #[test]
    fn test_malformed_tokens_skipped() {
        // Non-numeric bound, wrong octet count, out-of-range octet, bad address
        let ips = expand_ip_range("10.0.0.a-3,10.0.1-3,10.0.0.250-300,999.1.1.1-2,bogus,10.0.0.9");
        assert_eq!(ips, vec!["10.0.0.9"]);
    }

    #[test]
    fn test_descending_range_is_empty() {
        assert!(expand_ip_range("10.0.0.9-3").is_empty());
    }
}
