//! Listen address resolution.
//!
//! A server may be asked to listen on `localhost` (every loopback address),
//! `*` (every loopback and public address), explicit addresses, or a mix.
//! The markers are expanded against the host's interfaces at start time so the
//! recorded descriptor only ever carries concrete addresses, local ones first.

use super::interfaces::AddressEnumerator;
use crate::config::DescriptorConfig;
use crate::error::Result;
use tracing::debug;

/// A requested listen binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenRequest {
    /// Only the given addresses.
    Explicit(Vec<String>),
    /// Every loopback address, plus `extra`.
    Loopback { extra: Vec<String> },
    /// Every loopback and public address, plus `extra`.
    Wildcard { extra: Vec<String> },
}

impl ListenRequest {
    /// Parse the string-list form, where `"*"` and `"localhost"` are markers.
    ///
    /// The wildcard already covers loopback, so it wins when both are present.
    pub fn from_markers(requested: &[String]) -> Self {
        let has = |marker: &str| requested.iter().any(|addr| addr == marker);
        let extra = || -> Vec<String> {
            requested
                .iter()
                .filter(|addr| !is_marker(addr))
                .cloned()
                .collect()
        };

        if has(DescriptorConfig::WILDCARD_MARKER) {
            ListenRequest::Wildcard { extra: extra() }
        } else if has(DescriptorConfig::LOOPBACK_MARKER) {
            ListenRequest::Loopback { extra: extra() }
        } else {
            ListenRequest::Explicit(requested.to_vec())
        }
    }

    /// The string-list form, as passed to the database server.
    pub fn to_markers(&self) -> Vec<String> {
        let (marker, extra) = match self {
            ListenRequest::Explicit(addresses) => return addresses.clone(),
            ListenRequest::Loopback { extra } => (DescriptorConfig::LOOPBACK_MARKER, extra),
            ListenRequest::Wildcard { extra } => (DescriptorConfig::WILDCARD_MARKER, extra),
        };
        std::iter::once(marker.to_string())
            .chain(extra.iter().cloned())
            .collect()
    }

    /// Expand into concrete addresses.
    pub fn resolve(&self, enumerator: &dyn AddressEnumerator) -> Result<Vec<String>> {
        resolve_listen_addresses(&self.to_markers(), enumerator)
    }
}

fn is_marker(addr: &str) -> bool {
    addr == DescriptorConfig::WILDCARD_MARKER || addr == DescriptorConfig::LOOPBACK_MARKER
}

/// True for addresses only reachable from this host.
pub fn is_local_address(addr: &str) -> bool {
    DescriptorConfig::LOCAL_ADDRESSES.contains(&addr)
}

/// Expand listen markers into a deduplicated, locals-first address list.
///
/// `"localhost"` is replaced by the loopback addresses and `"*"` by the
/// loopback and public addresses. Any other entries are kept as given. The
/// result has no duplicates, and local addresses come before all others with
/// relative order otherwise preserved.
///
/// # Errors
/// Fails if the enumerator cannot produce an address set a marker needs.
/// Listening configuration is never guessed.
pub fn resolve_listen_addresses(
    requested: &[String],
    enumerator: &dyn AddressEnumerator,
) -> Result<Vec<String>> {
    let mut remaining: Vec<&String> = requested.iter().collect();
    let mut addresses: Vec<String> = Vec::new();

    if remaining
        .iter()
        .any(|addr| *addr == DescriptorConfig::LOOPBACK_MARKER)
    {
        remaining.retain(|addr| *addr != DescriptorConfig::LOOPBACK_MARKER);
        addresses = enumerator.loopback_addresses()?;
    }

    if remaining
        .iter()
        .any(|addr| *addr == DescriptorConfig::WILDCARD_MARKER)
    {
        remaining.retain(|addr| *addr != DescriptorConfig::WILDCARD_MARKER);
        addresses = enumerator.loopback_addresses()?;
        addresses.extend(enumerator.public_addresses()?);
    }

    addresses.extend(remaining.into_iter().cloned());

    let mut distinct: Vec<String> = Vec::with_capacity(addresses.len());
    for addr in addresses {
        if !distinct.contains(&addr) {
            distinct.push(addr);
        }
    }

    // Stable, so order within each partition is kept
    distinct.sort_by_key(|addr| !is_local_address(addr));

    debug!("Resolved listen addresses {:?} to {:?}", requested, distinct);
    Ok(distinct)
}
