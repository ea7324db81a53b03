//! Network address discovery for the running-instance descriptor.
//!
//! - `interfaces` - Loopback and public address enumeration
//! - `listen` - Expansion of requested listen addresses into concrete ones

pub mod interfaces;
pub mod listen;

pub use interfaces::{AddressEnumerator, StaticAddresses, SystemInterfaces};
pub use listen::{is_local_address, resolve_listen_addresses, ListenRequest};
