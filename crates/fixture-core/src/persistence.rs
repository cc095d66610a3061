//! Persisted-state store for the instrumentation client.
//!
//! Stand-in for the OS-provided key/value store the client uses to remember
//! identifiers across launches. Entries live as files under a per-application
//! namespace directory; the harness itself only ever erases a namespace, but
//! `put`/`get` exist so tests and the client can populate state.

use crate::error::HarnessError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The application's own identity namespace.
///
/// Resolution order: explicit value from harness configuration, then the
/// `FIXTURE_APP_ID` environment variable. Failure to resolve means the test
/// environment is broken, not a condition to recover from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity(String);

impl AppIdentity {
    /// Environment variable consulted when no explicit identity is set.
    pub const ENV_VAR: &'static str = "FIXTURE_APP_ID";

    /// Resolves the application identity.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, HarnessError> {
        if let Some(id) = explicit {
            let id = id.trim();
            if !id.is_empty() {
                return Ok(Self(id.to_string()));
            }
        }

        match std::env::var(Self::ENV_VAR) {
            Ok(id) if !id.trim().is_empty() => Ok(Self(id.trim().to_string())),
            _ => Err(HarnessError::Environment(format!(
                "no app_id configured and {} is unset",
                Self::ENV_VAR
            ))),
        }
    }

    /// The identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// File-backed key/value store namespaced by application identity.
pub struct PersistentStore {
    root: PathBuf,
}

impl PersistentStore {
    /// Default store root, relative to the fixture's working directory.
    pub const DEFAULT_ROOT: &'static str = ".fixture/state";

    /// Creates a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store at the default root.
    pub fn default_root() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }

    fn namespace_dir(&self, identity: &AppIdentity) -> PathBuf {
        self.root.join(identity.as_str())
    }

    /// Writes an entry under the identity's namespace.
    pub fn put(&self, identity: &AppIdentity, key: &str, value: &str) -> std::io::Result<()> {
        let dir = self.namespace_dir(identity);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(key), value)
    }

    /// Reads an entry, or `None` if absent.
    pub fn get(&self, identity: &AppIdentity, key: &str) -> std::io::Result<Option<String>> {
        match fs::read_to_string(self.namespace_dir(identity).join(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Number of entries under the identity's namespace.
    pub fn entry_count(&self, identity: &AppIdentity) -> std::io::Result<usize> {
        match fs::read_dir(self.namespace_dir(identity)) {
            Ok(entries) => Ok(entries.count()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Erases every entry under the identity's namespace.
    ///
    /// Idempotent: clearing an absent namespace is a no-op.
    pub fn clear_namespace(&self, identity: &AppIdentity) -> std::io::Result<()> {
        let dir = self.namespace_dir(identity);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!(namespace = %identity, "persisted state erased");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
