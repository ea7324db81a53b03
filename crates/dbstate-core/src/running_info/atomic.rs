//! Atomic file operations for the descriptor file.
//!
//! Writes go through a sibling temp file:
//! 1. Write to temp file with unique PID+TID suffix, owner-only permissions
//! 2. fsync to ensure data reaches disk
//! 3. Atomic rename to target path
//!
//! A concurrent reader therefore sees the old file, the new file, or no file,
//! never a partial one.

use crate::error::{DbStateError, Result};
use crate::platform::permissions::set_private;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use tracing::{debug, warn};

/// Read a file's raw bytes.
///
/// Returns `None` only if the file doesn't exist. Any other failure, such as
/// a permission error on the file or a parent directory, is an error. The
/// contents are not decoded here.
pub fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist", path.display());
            Ok(None)
        }
        Err(e) => Err(DbStateError::Io {
            message: format!("Failed to read {}", path.display()),
            path: Some(path.to_path_buf()),
            source: Some(e),
        }),
    }
}

/// Serialize data as indented JSON and write it atomically, owner-only.
///
/// Creates the parent directory if needed and replaces any existing file.
pub fn write_private_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| DbStateError::Io {
                message: format!("Failed to create directory {}", parent.display()),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }
    }

    let serialized = serde_json::to_string_pretty(data).map_err(|e| DbStateError::Json {
        message: format!("Failed to serialize {}: {}", path.display(), e),
        source: Some(e),
    })?;

    let temp_path = temp_path_for(path);
    if let Err(e) = write_temp(&temp_path, serialized.as_bytes()) {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove temp file {}: {}", temp_path.display(), cleanup);
            }
        }
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| DbStateError::Io {
        message: format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        ),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;

    debug!("Atomically wrote {}", path.display());
    Ok(())
}

fn write_temp(temp_path: &Path, contents: &[u8]) -> Result<()> {
    let io_err = |message: &str, e: io::Error| DbStateError::Io {
        message: format!("{} {}", message, temp_path.display()),
        path: Some(temp_path.to_path_buf()),
        source: Some(e),
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(temp_path)
        .map_err(|e| io_err("Failed to create temp file", e))?;

    // mode() only applies on creation; a leftover temp file keeps its old bits
    set_private(temp_path)?;

    file.write_all(contents)
        .map_err(|e| io_err("Failed to write temp file", e))?;
    file.flush()
        .map_err(|e| io_err("Failed to flush temp file", e))?;
    file.sync_all()
        .map_err(|e| io_err("Failed to sync temp file", e))?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.{}.tmp", process::id(), thread_id()));
    path.with_file_name(name)
}

/// Get a unique thread identifier.
fn thread_id() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    thread::current().id().hash(&mut hasher);
    hasher.finish()
}
