//! Network interface enumeration for the operator page

use if_addrs::{get_if_addrs, IfAddr};
use serde::Serialize;
use tracing::warn;

/// One IPv4 address bound to a local interface
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceAddress {
    pub interface: String,
    pub address: String,
}

/// List the IPv4 addresses of all local interfaces, in enumeration order.
///
/// Enumeration failure degrades to an empty list; the operator page then
/// simply has nothing to offer.
pub fn ipv4_interfaces() -> Vec<InterfaceAddress> {
    match get_if_addrs() {
        Ok(interfaces) => interfaces
            .into_iter()
            .filter_map(|iface| {
                let address = match &iface.addr {
                    IfAddr::V4(v4) => v4.ip.to_string(),
                    _ => return None,
                };
                Some(InterfaceAddress {
                    interface: iface.name,
                    address,
                })
            })
            .collect(),
        Err(e) => {
            warn!("Failed to enumerate network interfaces: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_interfaces_only_returns_ipv4() {
        for entry in ipv4_interfaces() {
            assert!(
                entry.address.parse::<std::net::Ipv4Addr>().is_ok(),
                "not an IPv4 address: {}",
                entry.address
            );
            assert!(!entry.interface.is_empty());
        }
    }
}
