//! Employee domain model.
//!
//! # Responsibility
//! - Define the parent record of the employee / personnel-file pair.
//! - Validate required fields before the coordinator touches storage.
//!
//! # Invariants
//! - A non-deleted employee owns exactly one non-deleted personnel file.
//! - `national_id` is unique among non-deleted employees.

use super::file::PersonnelFile;
use super::{is_blank, is_iso_date, RecordMeta};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate id for employees.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EmployeeId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeValidationError {
    BlankFirstName,
    BlankLastName,
    BlankNationalId,
    /// `hired_on` is present but not a `YYYY-MM-DD` date.
    BadHireDate,
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankFirstName => write!(f, "first name cannot be blank"),
            Self::BlankLastName => write!(f, "last name cannot be blank"),
            Self::BlankNationalId => write!(f, "national identifier cannot be blank"),
            Self::BadHireDate => write!(f, "hire date must be a YYYY-MM-DD date"),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Parent record of the pair. Reads hydrate `file` through a single joined
/// round trip; `None` after a read means the pairing invariant was broken by
/// earlier data, not that the field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub first_name: String,
    pub last_name: String,
    /// Natural key; unique among non-deleted employees.
    pub national_id: String,
    pub email: Option<String>,
    /// Start of the employment relationship, `YYYY-MM-DD`.
    pub hired_on: Option<String>,
    pub department: Option<String>,
    /// Owned one-to-one association; mandatory at creation time.
    pub file: Option<PersonnelFile>,
}

impl Employee {
    /// Creates an unpersisted employee with the required fields set.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        national_id: impl Into<String>,
    ) -> Self {
        Self {
            meta: RecordMeta::default(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            national_id: national_id.into(),
            email: None,
            hired_on: None,
            department: None,
            file: None,
        }
    }

    /// Field-level validation; runs before any storage access.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if is_blank(&self.first_name) {
            return Err(EmployeeValidationError::BlankFirstName);
        }
        if is_blank(&self.last_name) {
            return Err(EmployeeValidationError::BlankLastName);
        }
        if is_blank(&self.national_id) {
            return Err(EmployeeValidationError::BlankNationalId);
        }
        if let Some(hired_on) = self.hired_on.as_deref() {
            if !is_iso_date(hired_on) {
                return Err(EmployeeValidationError::BadHireDate);
            }
        }
        Ok(())
    }
}
