//! Connection acquisition seam consumed by the repositories.
//!
//! # Responsibility
//! - Hand out ready-to-use (bootstrapped, migrated) connections on demand.
//! - Keep the storage location an injection-time decision.
//!
//! # Invariants
//! - Every acquired connection is used by exactly one operation and dropped
//!   before the call returns; connections are never shared across requests.

use super::{open_db, DbResult};
use rusqlite::Connection;
use std::path::PathBuf;

/// Opaque connection-acquisition contract.
///
/// Repositories acquire one connection per self-contained operation;
/// coordinators acquire one per transaction scope.
pub trait ConnectionProvider {
    fn acquire(&self) -> DbResult<Connection>;
}

/// File-backed SQLite provider; every acquisition opens a fresh connection
/// onto the same database file.
#[derive(Debug, Clone)]
pub struct FileDbProvider {
    path: PathBuf,
}

impl FileDbProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConnectionProvider for FileDbProvider {
    fn acquire(&self) -> DbResult<Connection> {
        open_db(&self.path)
    }
}
