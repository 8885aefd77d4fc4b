//! Core domain logic for Staffbook.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::provider::{ConnectionProvider, FileDbProvider};
pub use db::scope::{ScopeError, TxScope};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{Employee, EmployeeId, EmployeeValidationError};
pub use model::file::{ContractStatus, FileId, FileValidationError, PersonnelFile};
pub use model::RecordMeta;
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::file_repo::{FileRepository, SqliteFileRepository};
pub use repo::{RepoError, RepoResult};
pub use service::employee_service::{EmployeeService, EmployeeServiceError};
pub use service::file_service::{FileService, FileServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
