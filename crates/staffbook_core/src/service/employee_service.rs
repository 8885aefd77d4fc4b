//! Employee use-case service: the transactional unit of work for the pair.
//!
//! # Responsibility
//! - Validate the employee record and its business invariants.
//! - Drive both entities' writes through one transaction scope per call.
//! - Expose validated pass-through reads that bypass the scope entirely.
//!
//! # Invariants
//! - Create inserts the employee first (the foreign key needs its generated
//!   id), then the file in the same scope.
//! - Delete soft-deletes the file first (child before parent), then the
//!   employee, in the same scope.
//! - Any failure between begin and commit rolls back through the scope's
//!   drop before the error reaches the caller.

use crate::db::provider::ConnectionProvider;
use crate::db::scope::{ScopeError, TxScope};
use crate::model::employee::{Employee, EmployeeId, EmployeeValidationError};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::file_repo::FileRepository;
use crate::repo::RepoError;
use crate::service::file_service::{FileService, FileServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for employee use-cases.
#[derive(Debug)]
pub enum EmployeeServiceError {
    Validation(EmployeeValidationError),
    /// The national identifier already belongs to another non-deleted
    /// employee.
    DuplicateNationalId(String),
    /// Creation was attempted without an attached personnel file.
    MissingFile,
    /// Update was attempted with an attached file that was never persisted.
    MissingFileId,
    InvalidId(i64),
    NotFound(EmployeeId),
    /// No non-deleted employee holds the given national identifier.
    UnknownNationalId(String),
    /// A non-deleted employee without a personnel file was found at delete
    /// time; this signals prior corruption, not user error.
    Integrity(EmployeeId),
    File(FileServiceError),
    Scope(ScopeError),
    Repo(RepoError),
}

impl Display for EmployeeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateNationalId(national_id) => write!(
                f,
                "national identifier `{national_id}` already belongs to an active employee"
            ),
            Self::MissingFile => {
                write!(f, "an employee must carry a personnel file to create")
            }
            Self::MissingFileId => write!(
                f,
                "employee update requires an already-persisted personnel file"
            ),
            Self::InvalidId(id) => write!(f, "employee id must be positive, got {id}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::UnknownNationalId(national_id) => write!(
                f,
                "no active employee holds national identifier `{national_id}`"
            ),
            Self::Integrity(id) => write!(
                f,
                "data integrity violation: employee {id} has no active personnel file"
            ),
            Self::File(err) => write!(f, "{err}"),
            Self::Scope(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EmployeeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::File(err) => Some(err),
            Self::Scope(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for EmployeeServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FileServiceError> for EmployeeServiceError {
    fn from(value: FileServiceError) -> Self {
        Self::File(value)
    }
}

impl From<ScopeError> for EmployeeServiceError {
    fn from(value: ScopeError) -> Self {
        Self::Scope(value)
    }
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<crate::db::DbError> for EmployeeServiceError {
    fn from(value: crate::db::DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

/// Employee coordinator; the only component that opens transaction scopes
/// for writes. Dependencies are injected at composition time.
pub struct EmployeeService<P, E, F>
where
    P: ConnectionProvider,
    E: EmployeeRepository,
    F: FileRepository,
{
    provider: P,
    repo: E,
    files: FileService<F>,
}

impl<P, E, F> EmployeeService<P, E, F>
where
    P: ConnectionProvider,
    E: EmployeeRepository,
    F: FileRepository,
{
    /// Creates the coordinator from its injected collaborators.
    pub fn new(provider: P, repo: E, files: FileService<F>) -> Self {
        Self {
            provider,
            repo,
            files,
        }
    }

    /// Creates the employee and its personnel file as one atomic unit.
    ///
    /// On success the store-assigned ids are written back onto `employee`
    /// and its attached file.
    pub fn create(&self, employee: &mut Employee) -> Result<(), EmployeeServiceError> {
        employee.validate()?;
        self.ensure_national_id_free(&employee.national_id, None)?;
        let file = match employee.file.as_ref() {
            Some(file) => file,
            None => return Err(EmployeeServiceError::MissingFile),
        };

        let mut scope = TxScope::try_new(self.provider.acquire()?)?;
        scope.begin()?;
        // Employee row goes first so its generated id exists for the file's
        // foreign key.
        let employee_id = self.repo.create_in_scope(employee, &scope)?;
        let file_id = self.files.create_in_scope(file, employee_id, &scope)?;
        scope.commit()?;

        employee.meta.id = employee_id;
        if let Some(file) = employee.file.as_mut() {
            file.meta.id = file_id;
        }
        Ok(())
    }

    /// Updates both records of the pair under one scope.
    ///
    /// The file is written first; the ordering carries no correctness
    /// dependency on update, it is simply kept consistent.
    pub fn update(&self, employee: &Employee) -> Result<(), EmployeeServiceError> {
        if !employee.meta.is_persisted() {
            return Err(EmployeeServiceError::InvalidId(employee.meta.id));
        }
        let file = match employee.file.as_ref() {
            Some(file) => file,
            None => return Err(EmployeeServiceError::MissingFile),
        };
        if !file.meta.is_persisted() {
            return Err(EmployeeServiceError::MissingFileId);
        }
        employee.validate()?;
        self.ensure_national_id_free(&employee.national_id, Some(employee.meta.id))?;

        let mut scope = TxScope::try_new(self.provider.acquire()?)?;
        scope.begin()?;
        self.files.update_in_scope(file, &scope)?;
        self.repo.update_in_scope(employee, &scope)?;
        scope.commit()?;
        Ok(())
    }

    /// Soft-deletes the employee and its personnel file as one atomic unit.
    pub fn delete(&self, id: EmployeeId) -> Result<(), EmployeeServiceError> {
        if id <= 0 {
            return Err(EmployeeServiceError::InvalidId(id));
        }
        let employee = self
            .repo
            .find_by_id(id)?
            .ok_or(EmployeeServiceError::NotFound(id))?;
        let file_id = match employee.file.as_ref() {
            Some(file) => file.meta.id,
            None => return Err(EmployeeServiceError::Integrity(id)),
        };

        let mut scope = TxScope::try_new(self.provider.acquire()?)?;
        scope.begin()?;
        // Child before parent, respecting the foreign key on deletion order.
        self.files.delete_in_scope(file_id, &scope)?;
        self.repo.soft_delete_in_scope(id, &scope)?;
        scope.commit()?;
        Ok(())
    }

    /// Gets one non-deleted employee, file hydrated.
    pub fn get(&self, id: EmployeeId) -> Result<Employee, EmployeeServiceError> {
        if id <= 0 {
            return Err(EmployeeServiceError::InvalidId(id));
        }
        self.repo
            .find_by_id(id)?
            .ok_or(EmployeeServiceError::NotFound(id))
    }

    /// Lists all non-deleted employees, files hydrated.
    pub fn get_all(&self) -> Result<Vec<Employee>, EmployeeServiceError> {
        Ok(self.repo.find_all()?)
    }

    /// Exact lookup by national identifier.
    pub fn get_by_national_id(&self, national_id: &str) -> Result<Employee, EmployeeServiceError> {
        let trimmed = national_id.trim();
        if trimmed.is_empty() {
            return Err(EmployeeServiceError::Validation(
                EmployeeValidationError::BlankNationalId,
            ));
        }
        self.repo
            .find_by_national_id(trimmed)?
            .ok_or_else(|| EmployeeServiceError::UnknownNationalId(trimmed.to_string()))
    }

    /// Case-insensitive substring search over first or last name; blank
    /// input yields an empty result without touching storage.
    pub fn search_by_name(&self, text: &str) -> Result<Vec<Employee>, EmployeeServiceError> {
        Ok(self.repo.search_by_name(text)?)
    }

    fn ensure_national_id_free(
        &self,
        national_id: &str,
        own_id: Option<EmployeeId>,
    ) -> Result<(), EmployeeServiceError> {
        if let Some(existing) = self.repo.find_by_national_id(national_id)? {
            if own_id.map_or(true, |id| existing.meta.id != id) {
                return Err(EmployeeServiceError::DuplicateNationalId(
                    national_id.trim().to_string(),
                ));
            }
        }
        Ok(())
    }
}
