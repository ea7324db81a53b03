//! Persistence of the running-instance descriptor.
//!
//! One file holds the most recently saved descriptor. There is no locking:
//! the last writer wins, and a reader racing a writer or a removal sees the
//! old file, the new file, or no file.

use super::atomic::{read_bytes, write_private_json};
use super::descriptor::RunningInstanceInfo;
use crate::config::DescriptorConfig;
use crate::error::{DbStateError, Result};
use crate::platform;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Why no descriptor was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentReason {
    /// No descriptor file; no server is running.
    Missing,
    /// The file exists but is not a descriptor this version can read.
    Unparseable,
}

/// Result of reading the descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Found(RunningInstanceInfo),
    Absent(AbsentReason),
}

impl LoadOutcome {
    /// Collapse to "descriptor or nothing".
    pub fn into_info(self) -> Option<RunningInstanceInfo> {
        match self {
            LoadOutcome::Found(info) => Some(info),
            LoadOutcome::Absent(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LoadOutcome::Found(_))
    }
}

/// Reads and writes the descriptor at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningInfoStore {
    path: PathBuf,
}

impl RunningInfoStore {
    /// Use the descriptor file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the platform default descriptor location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(platform::running_info_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `info`, replacing any existing descriptor.
    ///
    /// The struct version is re-stamped to the current one first. The file
    /// includes the plaintext password and is written owner-only.
    pub fn save(&self, info: &mut RunningInstanceInfo) -> Result<()> {
        info.stamp_current_version();
        write_private_json(&self.path, info)?;
        debug!(
            "Saved running instance info for pid {} to {}",
            info.pid,
            self.path.display()
        );
        Ok(())
    }

    /// Read the descriptor.
    ///
    /// A missing file is [`AbsentReason::Missing`]. A file that cannot be
    /// parsed is logged once and reported as [`AbsentReason::Unparseable`]
    /// rather than as an error, so a corrupt state file never blocks tooling.
    ///
    /// # Errors
    /// Only when the file exists but cannot be read.
    pub fn load(&self) -> Result<LoadOutcome> {
        debug!("load running instance info start");
        let outcome = self.load_inner();
        debug!("load running instance info end");
        outcome
    }

    fn load_inner(&self) -> Result<LoadOutcome> {
        let Some(contents) = read_bytes(&self.path)? else {
            return Ok(LoadOutcome::Absent(AbsentReason::Missing));
        };

        let info: RunningInstanceInfo = match serde_json::from_slice(&contents) {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    "Failed to parse database state file {}: {}",
                    self.path.display(),
                    e
                );
                return Ok(LoadOutcome::Absent(AbsentReason::Unparseable));
            }
        };

        if !info.is_current_version() {
            debug!(
                "Database state file {} has struct version {}, current is {}",
                self.path.display(),
                info.struct_version,
                DescriptorConfig::STRUCT_VERSION
            );
        }

        Ok(LoadOutcome::Found(info))
    }

    /// Read the descriptor, treating every absence the same.
    pub fn load_info(&self) -> Result<Option<RunningInstanceInfo>> {
        Ok(self.load()?.into_info())
    }

    /// Delete the descriptor file.
    ///
    /// # Errors
    /// Any failure, including the file already being gone; see
    /// [`DbStateError::is_not_found`].
    pub fn remove(&self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|e| DbStateError::io_with_path(e, &self.path))?;
        debug!("Removed running instance info {}", self.path.display());
        Ok(())
    }
}
