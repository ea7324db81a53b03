//! Platform-specific file permission handling.
//!
//! The descriptor carries the database password in plaintext, so it must only
//! be readable by the user that wrote it.

use crate::error::{DbStateError, Result};
use std::path::Path;
use tracing::debug;

/// Set file permissions to be readable and writable by owner only.
///
/// # Platform Behavior
/// - **Linux/macOS**: Sets mode 0o600
/// - **Windows**: Uses standard file permissions (no special handling needed)
pub fn set_private(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata =
            std::fs::metadata(path).map_err(|e| DbStateError::io_with_path(e, path))?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|e| DbStateError::io_with_path(e, path))?;
        debug!("Set private permissions (0600) on: {}", path.display());
    }

    #[cfg(not(unix))]
    {
        // Windows uses ACLs; the per-user data directory is already private
        debug!(
            "Skipping private permission setting on this platform for: {}",
            path.display()
        );
    }

    Ok(())
}

/// Check that no group or other permission bits are set.
///
/// Always true on platforms without Unix modes.
pub fn is_private(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(path) {
            Ok(metadata) => metadata.permissions().mode() & 0o077 == 0,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}
