//! Host network interface enumeration.
//!
//! [`AddressEnumerator`] is the seam the listen-address resolver consumes.
//! [`SystemInterfaces`] reads the live interface table; [`StaticAddresses`]
//! serves a fixed set.

use crate::error::{DbStateError, Result};
use std::net::IpAddr;
use tracing::debug;

/// Source of the host's loopback and public addresses.
pub trait AddressEnumerator: Send + Sync {
    /// Addresses only reachable from this host.
    fn loopback_addresses(&self) -> Result<Vec<String>>;

    /// Addresses reachable from other hosts.
    fn public_addresses(&self) -> Result<Vec<String>>;
}

/// Enumerates the live interface table via `if-addrs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl SystemInterfaces {
    pub fn new() -> Self {
        Self
    }

    fn collect(kind: &str, keep: impl Fn(&IpAddr) -> bool) -> Result<Vec<String>> {
        let interfaces = if_addrs::get_if_addrs().map_err(|e| {
            DbStateError::address_resolution(format!("Failed to enumerate {kind} addresses"), e)
        })?;

        let ips = interfaces
            .iter()
            .map(|iface| iface.ip())
            .filter(|ip| keep(ip))
            .collect();
        let addresses = order_addresses(ips);

        debug!("Found {} {} addresses: {:?}", addresses.len(), kind, addresses);
        Ok(addresses)
    }
}

impl AddressEnumerator for SystemInterfaces {
    fn loopback_addresses(&self) -> Result<Vec<String>> {
        Self::collect("loopback", IpAddr::is_loopback)
    }

    fn public_addresses(&self) -> Result<Vec<String>> {
        Self::collect("public", is_public)
    }
}

/// A fixed address set, for callers that already know their addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAddresses {
    pub loopback: Vec<String>,
    pub public: Vec<String>,
}

impl StaticAddresses {
    pub fn new<L, P>(loopback: L, public: P) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            loopback: loopback.into_iter().map(Into::into).collect(),
            public: public.into_iter().map(Into::into).collect(),
        }
    }
}

impl AddressEnumerator for StaticAddresses {
    fn loopback_addresses(&self) -> Result<Vec<String>> {
        Ok(self.loopback.clone())
    }

    fn public_addresses(&self) -> Result<Vec<String>> {
        Ok(self.public.clone())
    }
}

/// Non-loopback, routable from outside the link.
fn is_public(ip: &IpAddr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() {
        return false;
    }
    match ip {
        IpAddr::V4(v4) => !v4.is_link_local(),
        // fe80::/10
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) != 0xfe80,
    }
}

/// IPv4 before IPv6, interface order otherwise, no repeats.
fn order_addresses(mut ips: Vec<IpAddr>) -> Vec<String> {
    ips.sort_by_key(IpAddr::is_ipv6);
    let mut addresses: Vec<String> = Vec::with_capacity(ips.len());
    for ip in ips {
        let addr = ip.to_string();
        if !addresses.contains(&addr) {
            addresses.push(addr);
        }
    }
    addresses
}
