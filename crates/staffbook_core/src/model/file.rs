//! Personnel-file domain model.
//!
//! # Responsibility
//! - Define the child record owned by exactly one employee.
//! - Validate field shapes and length caps before persistence.
//!
//! # Invariants
//! - `file_number` is unique among non-deleted files.
//! - The owning-employee reference is immutable after creation; it lives only
//!   in storage and never on this model.
//! - Soft-deleting a file forces its contractual status to inactive.

use super::{is_blank, is_iso_date, RecordMeta};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const FILE_NUMBER_MAX_LEN: usize = 20;
pub const CATEGORY_MAX_LEN: usize = 30;
pub const NOTES_MAX_LEN: usize = 255;

/// Store-assigned surrogate id for personnel files.
pub type FileId = i64;

/// Contractual status of a personnel file.
///
/// Closed enumeration; storage marshaling to/from its textual form happens
/// at the repository boundary only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// The employee currently works here.
    Active,
    /// The employment relationship is suspended or ended.
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileValidationError {
    BlankFileNumber,
    FileNumberTooLong(usize),
    CategoryTooLong(usize),
    NotesTooLong(usize),
    /// `opened_on` is present but not a `YYYY-MM-DD` date.
    BadOpenDate,
}

impl Display for FileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankFileNumber => write!(f, "file number cannot be blank"),
            Self::FileNumberTooLong(len) => write!(
                f,
                "file number has {len} characters, maximum is {FILE_NUMBER_MAX_LEN}"
            ),
            Self::CategoryTooLong(len) => write!(
                f,
                "category has {len} characters, maximum is {CATEGORY_MAX_LEN}"
            ),
            Self::NotesTooLong(len) => {
                write!(f, "notes have {len} characters, maximum is {NOTES_MAX_LEN}")
            }
            Self::BadOpenDate => write!(f, "file opening date must be a YYYY-MM-DD date"),
        }
    }
}

impl Error for FileValidationError {}

/// Child record of the pair; meaningless without an owning employee, which is
/// why every write path runs through the employee coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelFile {
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Natural key; unique among non-deleted files.
    pub file_number: String,
    pub category: Option<String>,
    pub status: ContractStatus,
    /// File-opening date, `YYYY-MM-DD`.
    pub opened_on: Option<String>,
    pub notes: Option<String>,
}

impl PersonnelFile {
    /// Creates an unpersisted file with the required fields set.
    pub fn new(file_number: impl Into<String>, status: ContractStatus) -> Self {
        Self {
            meta: RecordMeta::default(),
            file_number: file_number.into(),
            category: None,
            status,
            opened_on: None,
            notes: None,
        }
    }

    /// Field-level validation; runs before any storage access.
    ///
    /// The contractual status needs no presence check: the field is not
    /// optional, so an absent status cannot be represented.
    pub fn validate(&self) -> Result<(), FileValidationError> {
        if is_blank(&self.file_number) {
            return Err(FileValidationError::BlankFileNumber);
        }
        let number_len = self.file_number.trim().chars().count();
        if number_len > FILE_NUMBER_MAX_LEN {
            return Err(FileValidationError::FileNumberTooLong(number_len));
        }
        if let Some(category) = self.category.as_deref() {
            let len = category.chars().count();
            if len > CATEGORY_MAX_LEN {
                return Err(FileValidationError::CategoryTooLong(len));
            }
        }
        if let Some(notes) = self.notes.as_deref() {
            let len = notes.chars().count();
            if len > NOTES_MAX_LEN {
                return Err(FileValidationError::NotesTooLong(len));
            }
        }
        if let Some(opened_on) = self.opened_on.as_deref() {
            if !is_iso_date(opened_on) {
                return Err(FileValidationError::BadOpenDate);
            }
        }
        Ok(())
    }
}
