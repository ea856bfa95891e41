//! JSON snapshot persistence
//!
//! A [`Snapshot`] bundles the registry state with the custody accounts so a host
//! that runs the registry one operation per process (like the CLI) can resume it.
//! Files are written to a temporary sibling and renamed into place.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::custody::InMemoryCustody;
use crate::registry::RegistryState;

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors raised while reading or writing snapshots
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid snapshot
    #[error("invalid snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot was written by an incompatible version
    #[error("unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Version this build writes
        expected: u32,
    },
}

/// Result type for snapshot operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted registry plus custody accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version
    pub version: u32,
    /// Registry state
    pub registry: RegistryState,
    /// Custody accounts
    pub custody: InMemoryCustody,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            registry: RegistryState::default(),
            custody: InMemoryCustody::default(),
        }
    }
}

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot has been written.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the snapshot, or an empty one if the file does not exist yet.
    pub fn load(&self) -> StoreResult<Snapshot> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No snapshot on disk, starting empty");
            return Ok(Snapshot::default());
        }

        let data = std::fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let snapshot: Snapshot = serde_json::from_slice(&data)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        debug!(
            path = ?self.path,
            height = snapshot.registry.height,
            registrants = snapshot.registry.ledger.len(),
            proposers = snapshot.registry.graph.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Write `snapshot` atomically.
    pub fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &data).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(path = ?self.path, bytes = data.len(), "Snapshot saved");
        Ok(())
    }
}
