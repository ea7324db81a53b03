//! Centralized configuration for the running-instance descriptor.
//!
//! This module provides the format version stamp, fixed credentials and file
//! names, and the [`Invoker`] tags recorded alongside a running server.

use serde::{Deserialize, Serialize};

/// Descriptor format and content constants.
pub struct DescriptorConfig;

impl DescriptorConfig {
    /// Current persisted format revision (date coded).
    pub const STRUCT_VERSION: i64 = 20220411;
    /// Database user every local instance is started with.
    pub const DATABASE_USER: &'static str = "root";
    /// Placeholder written in place of the password when rendering for display.
    pub const REDACTED_PASSWORD: &'static str = "XXXX-XXXX-XXXX";
    /// Addresses treated as local when ordering listen addresses.
    pub const LOCAL_ADDRESSES: [&'static str; 3] = ["127.0.0.1", "::1", "localhost"];
    /// Marker requesting every loopback address.
    pub const LOOPBACK_MARKER: &'static str = "localhost";
    /// Marker requesting every loopback and public address.
    pub const WILDCARD_MARKER: &'static str = "*";
}

/// Shared directory and path configurations.
pub struct PathsConfig;

impl PathsConfig {
    pub const APP_DIR_NAME: &'static str = "dbstate";
    pub const INTERNAL_DIR_NAME: &'static str = "internal";
    pub const RUNNING_INFO_FILENAME: &'static str = "running_db.json";
    /// Overrides the base directory the internal directory lives under.
    pub const INSTALL_DIR_ENV: &'static str = "DBSTATE_INSTALL_DIR";
}

/// What triggered the database server start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Invoker {
    Service,
    Query,
    Check,
    Plugin,
    Dashboard,
    Installer,
}

impl Invoker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Invoker::Service => "service",
            Invoker::Query => "query",
            Invoker::Check => "check",
            Invoker::Plugin => "plugin",
            Invoker::Dashboard => "dashboard",
            Invoker::Installer => "installer",
        }
    }
}

impl std::fmt::Display for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Invoker; 6] = [
        Invoker::Service,
        Invoker::Query,
        Invoker::Check,
        Invoker::Plugin,
        Invoker::Dashboard,
        Invoker::Installer,
    ];

    #[test]
    fn test_invoker_roundtrip() {
        for invoker in ALL {
            let json = format!("\"{}\"", invoker);
            let parsed: Invoker = serde_json::from_str(&json).expect("Should parse");
            assert_eq!(invoker, parsed);
        }
        assert!(serde_json::from_str::<Invoker>("\"repl\"").is_err());
    }

    #[test]
    fn test_invoker_serde_matches_as_str() {
        for invoker in ALL {
            let json = serde_json::to_string(&invoker).unwrap();
            assert_eq!(json, format!("\"{}\"", invoker.as_str()));
        }
    }

    #[test]
    fn test_struct_version_is_date_coded() {
        assert_eq!(DescriptorConfig::STRUCT_VERSION, 20220411);
        assert!(DescriptorConfig::LOCAL_ADDRESSES.contains(&DescriptorConfig::LOOPBACK_MARKER));
    }
}
