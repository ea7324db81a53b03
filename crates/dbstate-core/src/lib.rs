//! dbstate Core - discovery descriptor for a locally running database server.
//!
//! When a local database server is started, the starting process records how
//! to reach it (pid, listen addresses, port, credentials) in a small JSON file.
//! Later CLI invocations, health checks and shutdown commands read that file
//! instead of launching a second server.
//!
//! # Example
//!
//! ```rust,no_run
//! use dbstate_core::{Invoker, RunningInfoStore, RunningInstanceInfo, SystemInterfaces};
//!
//! fn main() -> dbstate_core::Result<()> {
//!     let store = RunningInfoStore::default_location()?;
//!
//!     let mut info = RunningInstanceInfo::new(
//!         std::process::id(),
//!         &["localhost".to_string()],
//!         9193,
//!         "appdb",
//!         "generated-password",
//!         Invoker::Service,
//!         &SystemInterfaces::new(),
//!     )?;
//!     store.save(&mut info)?;
//!
//!     // Safe to log: the password is redacted
//!     println!("{}", info);
//!
//!     if let Some(running) = store.load_info()? {
//!         println!("{:?}", running.connection_string());
//!     }
//!
//!     store.remove()?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod network;
pub mod platform;
pub mod running_info;

// Re-export commonly used types
pub use config::{DescriptorConfig, Invoker};
pub use error::{DbStateError, Result};
pub use network::{
    resolve_listen_addresses, AddressEnumerator, ListenRequest, StaticAddresses,
    SystemInterfaces,
};
pub use running_info::{AbsentReason, LoadOutcome, RunningInfoStore, RunningInstanceInfo};
