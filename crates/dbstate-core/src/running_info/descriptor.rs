//! The running-instance descriptor value.

use crate::config::{DescriptorConfig, Invoker};
use crate::error::Result;
use crate::network::{resolve_listen_addresses, AddressEnumerator};
use serde::{Deserialize, Serialize};
use std::process::Child;
use tracing::trace;

/// Data about a running database server process and its credentials.
///
/// The persisted JSON field names are part of the on-disk format read by
/// other processes; do not rename them without bumping
/// [`DescriptorConfig::STRUCT_VERSION`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningInstanceInfo {
    pub pid: u32,
    /// Concrete listen addresses, local ones first.
    #[serde(rename = "listen")]
    pub listen_addresses: Vec<String>,
    pub port: u16,
    pub invoker: Invoker,
    /// Plaintext; only ever written to the descriptor file.
    pub password: String,
    pub user: String,
    pub database: String,
    pub struct_version: i64,
}

impl RunningInstanceInfo {
    /// Describe a freshly started server.
    ///
    /// `requested_addresses` may contain the `localhost` and `*` markers;
    /// they are expanded through `enumerator`. Nothing is written to disk.
    ///
    /// # Errors
    /// Returns [`crate::DbStateError::AddressResolution`] if a marker cannot
    /// be expanded.
    pub fn new(
        pid: u32,
        requested_addresses: &[String],
        port: u16,
        database: impl Into<String>,
        password: impl Into<String>,
        invoker: Invoker,
        enumerator: &dyn AddressEnumerator,
    ) -> Result<Self> {
        let listen_addresses = resolve_listen_addresses(requested_addresses, enumerator)?;

        Ok(Self {
            pid,
            listen_addresses,
            port,
            invoker,
            password: password.into(),
            user: DescriptorConfig::DATABASE_USER.to_string(),
            database: database.into(),
            struct_version: DescriptorConfig::STRUCT_VERSION,
        })
    }

    /// Describe a server the launcher just spawned.
    pub fn for_child(
        child: &Child,
        requested_addresses: &[String],
        port: u16,
        database: impl Into<String>,
        password: impl Into<String>,
        invoker: Invoker,
        enumerator: &dyn AddressEnumerator,
    ) -> Result<Self> {
        Self::new(
            child.id(),
            requested_addresses,
            port,
            database,
            password,
            invoker,
            enumerator,
        )
    }

    /// A copy with the password replaced by the redaction placeholder.
    pub fn redacted(&self) -> Self {
        Self {
            password: DescriptorConfig::REDACTED_PASSWORD.to_string(),
            ..self.clone()
        }
    }

    /// Compact single-line JSON with the password redacted, newline terminated.
    ///
    /// Renders from a redacted copy; `self` is never modified.
    pub fn render_redacted(&self) -> String {
        match serde_json::to_string(&self.redacted()) {
            Ok(mut rendered) => {
                rendered.push('\n');
                rendered
            }
            Err(e) => {
                trace!("Encode failed: {}", e);
                String::new()
            }
        }
    }

    pub fn is_current_version(&self) -> bool {
        self.struct_version == DescriptorConfig::STRUCT_VERSION
    }

    pub(crate) fn stamp_current_version(&mut self) {
        self.struct_version = DescriptorConfig::STRUCT_VERSION;
    }

    /// The address a client should try first.
    pub fn preferred_host(&self) -> Option<&str> {
        self.listen_addresses.first().map(String::as_str)
    }

    /// Password-free connection URL for the preferred host.
    pub fn connection_string(&self) -> Option<String> {
        let host = self.preferred_host()?;
        let host = if host.contains(':') {
            format!("[{}]", host)
        } else {
            host.to_string()
        };
        Some(format!(
            "postgres://{}@{}:{}/{}",
            self.user, host, self.port, self.database
        ))
    }
}

impl std::fmt::Display for RunningInstanceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_redacted())
    }
}

impl std::fmt::Debug for RunningInstanceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningInstanceInfo")
            .field("pid", &self.pid)
            .field("listen_addresses", &self.listen_addresses)
            .field("port", &self.port)
            .field("invoker", &self.invoker)
            .field("password", &DescriptorConfig::REDACTED_PASSWORD)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("struct_version", &self.struct_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbStateError;
    use crate::network::StaticAddresses;
    use std::io;

    const PASSWORD: &str = "s3cr3t-pa55-w0rd";

    fn host() -> StaticAddresses {
        StaticAddresses::new(["127.0.0.1", "::1"], ["203.0.113.9"])
    }

    fn sample() -> RunningInstanceInfo {
        RunningInstanceInfo::new(
            4242,
            &["*".to_string()],
            9193,
            "appdb",
            PASSWORD,
            Invoker::Service,
            &host(),
        )
        .unwrap()
    }

    struct NoInterfaces;

    impl AddressEnumerator for NoInterfaces {
        fn loopback_addresses(&self) -> Result<Vec<String>> {
            Err(DbStateError::address_resolution(
                "Failed to enumerate loopback addresses",
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            ))
        }

        fn public_addresses(&self) -> Result<Vec<String>> {
            self.loopback_addresses()
        }
    }

    #[test]
    fn test_new_fills_fields() {
        let info = sample();
        assert_eq!(info.pid, 4242);
        assert_eq!(info.listen_addresses, vec!["127.0.0.1", "::1", "203.0.113.9"]);
        assert_eq!(info.port, 9193);
        assert_eq!(info.user, DescriptorConfig::DATABASE_USER);
        assert_eq!(info.database, "appdb");
        assert_eq!(info.password, PASSWORD);
        assert_eq!(info.invoker, Invoker::Service);
        assert!(info.is_current_version());
    }

    #[test]
    fn test_new_propagates_resolution_failure() {
        let result = RunningInstanceInfo::new(
            1,
            &["localhost".to_string()],
            9193,
            "db",
            "pw",
            Invoker::Query,
            &NoInterfaces,
        );
        assert!(matches!(result, Err(DbStateError::AddressResolution { .. })));
    }

    #[test]
    fn test_render_redacted_hides_password() {
        let info = sample();
        let rendered = info.render_redacted();

        assert!(!rendered.contains(PASSWORD));
        assert!(rendered.contains(DescriptorConfig::REDACTED_PASSWORD));
        assert!(rendered.ends_with('\n'));
        assert_eq!(rendered.trim_end().lines().count(), 1);

        let parsed: RunningInstanceInfo = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, info.redacted());
        assert_eq!(parsed.listen_addresses, info.listen_addresses);
        assert_eq!(parsed.database, info.database);

        // The original is untouched
        assert_eq!(info.password, PASSWORD);
    }

    #[test]
    fn test_display_and_debug_redact() {
        let info = sample();
        assert_eq!(info.to_string(), info.render_redacted());
        assert!(!format!("{:?}", info).contains(PASSWORD));
        assert!(!format!("{:#?}", info).contains(PASSWORD));
    }

    #[test]
    fn test_persisted_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "database",
                "invoker",
                "listen",
                "password",
                "pid",
                "port",
                "struct_version",
                "user"
            ]
        );
        assert_eq!(object["invoker"], "service");
        assert_eq!(object["struct_version"], 20220411);
    }

    #[test]
    fn test_connection_string() {
        let info = sample();
        assert_eq!(info.preferred_host(), Some("127.0.0.1"));
        assert_eq!(
            info.connection_string().as_deref(),
            Some("postgres://root@127.0.0.1:9193/appdb")
        );

        let v6 = RunningInstanceInfo {
            listen_addresses: vec!["::1".to_string()],
            ..sample()
        };
        assert_eq!(
            v6.connection_string().as_deref(),
            Some("postgres://root@[::1]:9193/appdb")
        );

        let unbound = RunningInstanceInfo {
            listen_addresses: vec![],
            ..sample()
        };
        assert_eq!(unbound.connection_string(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_for_child_uses_child_pid() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let info = RunningInstanceInfo::for_child(
            &child,
            &["127.0.0.1".to_string()],
            9193,
            "db",
            "pw",
            Invoker::Query,
            &host(),
        )
        .unwrap();
        assert_eq!(info.pid, child.id());
        child.wait().unwrap();
    }
}
