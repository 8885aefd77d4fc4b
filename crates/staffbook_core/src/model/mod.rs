//! Domain model for employees and their personnel files.
//!
//! # Responsibility
//! - Define the canonical record pair managed by the coordinators.
//! - Own field-level validation rules, checked before any storage access.
//!
//! # Invariants
//! - Every persisted record carries a store-assigned surrogate id and a
//!   logical-deletion flag, composed as [`RecordMeta`].
//! - Deletion is represented by soft-delete tombstones, not hard delete.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod employee;
pub mod file;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Shared base shape of every persisted record: the surrogate id assigned by
/// the store on insert, and the logical-deletion flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Store-assigned surrogate id; zero until the record is persisted.
    pub id: i64,
    /// Soft-delete tombstone; rows are never physically removed.
    pub is_deleted: bool,
}

impl RecordMeta {
    /// Whether the record has been through a successful insert.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

/// Checks calendar-date fields stored as `YYYY-MM-DD` text.
///
/// Only the shape is enforced here; absent dates are `None`, never a
/// sentinel value.
pub(crate) fn is_iso_date(value: &str) -> bool {
    ISO_DATE_RE.is_match(value)
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
