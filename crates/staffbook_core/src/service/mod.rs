//! Business coordination services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce business invariants before storage is touched.
//! - Drive the transaction scope for every paired write.
//!
//! # Invariants
//! - Only the employee coordinator opens transaction scopes for writes.
//! - The personnel-file coordinator participates in externally owned scopes
//!   and rejects standalone create/delete by policy.

pub mod employee_service;
pub mod file_service;
