//! Personnel-file use-case service.
//!
//! # Responsibility
//! - Gatekeep business rules for the child entity of the pair.
//! - Offer the transaction-participating variants the employee coordinator
//!   drives, plus validated pass-through reads.
//!
//! # Invariants
//! - Standalone create and delete always fail: a personnel file only ever
//!   changes as part of its employee, so neither operation may touch storage.
//! - This service never opens a transaction scope of its own.

use crate::db::scope::TxScope;
use crate::model::employee::EmployeeId;
use crate::model::file::{ContractStatus, FileId, FileValidationError, PersonnelFile};
use crate::repo::file_repo::FileRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for personnel-file use-cases.
#[derive(Debug)]
pub enum FileServiceError {
    Validation(FileValidationError),
    /// The file number already belongs to another non-deleted file.
    DuplicateFileNumber(String),
    /// Standalone creation is disabled by policy.
    StandaloneCreate,
    /// Standalone deletion is disabled by policy.
    StandaloneDelete(FileId),
    InvalidId(i64),
    NotFound(FileId),
    Repo(RepoError),
}

impl Display for FileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateFileNumber(number) => write!(
                f,
                "file number `{number}` already belongs to an active personnel file"
            ),
            Self::StandaloneCreate => write!(
                f,
                "unsupported operation: a personnel file is created through its employee"
            ),
            Self::StandaloneDelete(id) => write!(
                f,
                "unsupported operation: delete the owning employee to retire personnel file {id}"
            ),
            Self::InvalidId(id) => write!(f, "personnel file id must be positive, got {id}"),
            Self::NotFound(id) => write!(f, "personnel file not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FileValidationError> for FileServiceError {
    fn from(value: FileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for FileServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Personnel-file coordinator over a repository implementation.
pub struct FileService<R: FileRepository> {
    repo: R,
}

impl<R: FileRepository> FileService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Always fails: a personnel file has no meaning without an owning
    /// employee. Retained in the contract to document the disabled path.
    pub fn create(&self, _file: &PersonnelFile) -> Result<FileId, FileServiceError> {
        Err(FileServiceError::StandaloneCreate)
    }

    /// Creates the file inside the employee's transaction.
    ///
    /// Called by the employee coordinator with the freshly generated owner
    /// id; validates field rules and re-checks file-number uniqueness
    /// against current storage state.
    pub fn create_in_scope(
        &self,
        file: &PersonnelFile,
        employee_id: EmployeeId,
        scope: &TxScope,
    ) -> Result<FileId, FileServiceError> {
        file.validate()?;
        self.ensure_number_free(&file.file_number, None)?;
        Ok(self.repo.create_in_scope(file, employee_id, scope)?)
    }

    /// Updates the file inside the employee's transaction.
    pub fn update_in_scope(
        &self,
        file: &PersonnelFile,
        scope: &TxScope,
    ) -> Result<(), FileServiceError> {
        require_persisted(file)?;
        file.validate()?;
        self.ensure_number_free(&file.file_number, Some(file.meta.id))?;
        Ok(self.repo.update_in_scope(file, scope)?)
    }

    /// Standalone update, for read-modify flows that do not also touch the
    /// employee row. Same validation as the participating variant.
    pub fn update(&self, file: &PersonnelFile) -> Result<(), FileServiceError> {
        require_persisted(file)?;
        file.validate()?;
        self.ensure_number_free(&file.file_number, Some(file.meta.id))?;
        Ok(self.repo.update(file)?)
    }

    /// Always fails: deletion must originate from the owning employee so
    /// both rows retire together.
    pub fn delete(&self, id: FileId) -> Result<(), FileServiceError> {
        Err(FileServiceError::StandaloneDelete(id))
    }

    /// Soft-deletes the file inside the employee's transaction.
    pub fn delete_in_scope(&self, id: FileId, scope: &TxScope) -> Result<(), FileServiceError> {
        if id <= 0 {
            return Err(FileServiceError::InvalidId(id));
        }
        Ok(self.repo.soft_delete_in_scope(id, scope)?)
    }

    /// Gets one non-deleted file by id.
    pub fn get_by_id(&self, id: FileId) -> Result<PersonnelFile, FileServiceError> {
        if id <= 0 {
            return Err(FileServiceError::InvalidId(id));
        }
        self.repo
            .find_by_id(id)?
            .ok_or(FileServiceError::NotFound(id))
    }

    /// Lists all non-deleted files.
    pub fn get_all(&self) -> Result<Vec<PersonnelFile>, FileServiceError> {
        Ok(self.repo.find_all()?)
    }

    /// Lists non-deleted files with the given contractual status.
    pub fn get_by_status(
        &self,
        status: ContractStatus,
    ) -> Result<Vec<PersonnelFile>, FileServiceError> {
        Ok(self.repo.find_by_status(status)?)
    }

    fn ensure_number_free(
        &self,
        file_number: &str,
        own_id: Option<FileId>,
    ) -> Result<(), FileServiceError> {
        if let Some(existing) = self.repo.find_by_number(file_number)? {
            if own_id.map_or(true, |id| existing.meta.id != id) {
                return Err(FileServiceError::DuplicateFileNumber(
                    file_number.trim().to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn require_persisted(file: &PersonnelFile) -> Result<(), FileServiceError> {
    if !file.meta.is_persisted() {
        return Err(FileServiceError::InvalidId(file.meta.id));
    }
    Ok(())
}
