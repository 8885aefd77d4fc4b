//! Explicit transaction scope over one storage connection.
//!
//! # Responsibility
//! - Bind a single connection to an explicit begin/commit/rollback boundary.
//! - Guarantee rollback-then-release on every exit path.
//!
//! # Invariants
//! - State machine: idle -> active (begin), active -> idle (commit/rollback),
//!   any -> released (drop).
//! - Commit is attempted at most once per begin.
//! - Rollback and drop-time cleanup never propagate storage errors; they are
//!   logged as warnings so the original failure stays visible.

use log::warn;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ScopeError {
    Sqlite(rusqlite::Error),
    /// The supplied connection already had an open transaction.
    ConnectionNotIdle,
    /// `begin` was called while a transaction is already active.
    AlreadyActive,
    /// `commit` was called with no active transaction.
    NotActive,
}

impl Display for ScopeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::ConnectionNotIdle => {
                write!(f, "connection already holds an open transaction")
            }
            Self::AlreadyActive => write!(f, "transaction scope is already active"),
            Self::NotActive => write!(f, "no active transaction to commit"),
        }
    }
}

impl Error for ScopeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for ScopeError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Owns one connection for the duration of a coordinated write.
///
/// All participating repository calls run against [`TxScope::conn`] so they
/// share the scope's transaction; the scope itself is the only place that
/// begins, commits or rolls back.
#[derive(Debug)]
pub struct TxScope {
    conn: Connection,
    active: bool,
}

impl TxScope {
    /// Wraps a connection in an idle scope.
    ///
    /// Rejects connections that already sit inside a transaction; a scope
    /// must be the sole owner of its transaction boundary.
    pub fn try_new(conn: Connection) -> Result<Self, ScopeError> {
        if !conn.is_autocommit() {
            return Err(ScopeError::ConnectionNotIdle);
        }
        Ok(Self {
            conn,
            active: false,
        })
    }

    /// The scope's connection, for participating repository operations.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts the transaction, suspending auto-commit until commit/rollback.
    pub fn begin(&mut self) -> Result<(), ScopeError> {
        if self.active {
            return Err(ScopeError::AlreadyActive);
        }
        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        self.active = true;
        Ok(())
    }

    /// Persists all work since `begin` and returns the scope to idle.
    pub fn commit(&mut self) -> Result<(), ScopeError> {
        if !self.active {
            return Err(ScopeError::NotActive);
        }
        self.conn.execute_batch("COMMIT;")?;
        self.active = false;
        Ok(())
    }

    /// Discards all work since `begin`. No-op when idle.
    ///
    /// Storage errors are logged and swallowed; rollback runs on failure
    /// paths and must never mask the error that triggered it.
    pub fn rollback(&mut self) {
        if !self.active {
            return;
        }
        if let Err(err) = self.conn.execute_batch("ROLLBACK;") {
            warn!("event=tx_rollback module=db status=error error={err}");
        }
        self.active = false;
    }
}

impl Drop for TxScope {
    fn drop(&mut self) {
        if self.active {
            warn!("event=tx_scope_drop module=db status=rollback");
            self.rollback();
        }
    }
}
