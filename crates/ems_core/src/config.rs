//! Record store configuration.
//!
//! # Responsibility
//! - Describe where the store lives and how it treats referenced deletes.
//!
//! # Invariants
//! - The delete policy is always an explicit part of the configuration; the
//!   default matches the legacy behavior and is documented as such.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backing location of the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Database file at a caller-supplied path; created when absent.
    File(PathBuf),
    /// Private in-memory database, discarded on close.
    Memory,
}

/// What happens when a Department, Position or Employee that other rows
/// still reference is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete succeeds and referencing rows keep the now dangling id. Reads
    /// stay null-safe: enrichment fields come back as `None`. Legacy behavior.
    #[default]
    LeaveDangling,
    /// Delete fails with `RepoError::Referenced` while any reference exists.
    Restrict,
}

/// Options for [`crate::RecordStore::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    pub delete_policy: DeletePolicy,
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// File-backed store with default policy and busy timeout.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: StoreLocation::File(path.as_ref().to_path_buf()),
            delete_policy: DeletePolicy::default(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// In-memory store, mostly for tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            delete_policy: DeletePolicy::default(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}
