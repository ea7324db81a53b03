//! Platform-specific path utilities.
//!
//! Resolves where the running-instance descriptor lives when the caller does
//! not inject a path of its own.
//!
//! # Platform Behavior
//! Uses the `dirs` crate for the base directory:
//! - **Linux**: `~/.local/share/dbstate`
//! - **Windows**: `%LOCALAPPDATA%\dbstate`
//! - **macOS**: `~/Library/Application Support/dbstate`
//!
//! Setting `DBSTATE_INSTALL_DIR` replaces the base directory entirely.

use crate::config::PathsConfig;
use crate::error::{DbStateError, Result};
use std::path::{Path, PathBuf};

/// Get the base install directory, honoring the environment override.
pub fn install_dir() -> Result<PathBuf> {
    let override_dir = std::env::var_os(PathsConfig::INSTALL_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    install_dir_from(override_dir)
}

fn install_dir_from(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }

    let data_dir = dirs::data_local_dir().ok_or_else(|| DbStateError::Config {
        message: "Could not determine local data directory".to_string(),
    })?;
    Ok(data_dir.join(PathsConfig::APP_DIR_NAME))
}

/// Get the default path of the running-instance descriptor.
pub fn running_info_file_path() -> Result<PathBuf> {
    Ok(running_info_file_in(&install_dir()?))
}

/// Get the descriptor path under a given install directory.
pub fn running_info_file_in(base: &Path) -> PathBuf {
    base.join(PathsConfig::INTERNAL_DIR_NAME)
        .join(PathsConfig::RUNNING_INFO_FILENAME)
}
