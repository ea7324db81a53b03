//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here rather than being
//! scattered through the descriptor code.
//!
//! - `paths` - Default location of the running-instance descriptor
//! - `permissions` - Owner-only file permissions for credential-bearing files

pub mod paths;
pub mod permissions;

pub use paths::{running_info_file_in, running_info_file_path};
pub use permissions::{is_private, set_private};
