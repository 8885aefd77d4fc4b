//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts with self-contained and
//!   scope-participating write variants.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - Self-contained operations acquire their own connection and rely on its
//!   implicit transaction; `*_in_scope` variants run on the caller's scope
//!   connection and never commit, roll back or close it.
//! - All read operations filter out logically deleted rows.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee_repo;
pub mod file_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Zero rows affected: the id does not exist or is already deleted.
    NotFound { entity: &'static str, id: i64 },
    /// An insert succeeded but the store produced no usable generated key.
    MissingGeneratedId(&'static str),
    /// A persisted value could not be mapped back onto the domain model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingGeneratedId(entity) => {
                write!(f, "no generated id returned for inserted {entity}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
