//! Personnel-file repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate personnel-file records to/from `personnel_files` rows.
//! - Own the status text marshaling for the whole crate.
//!
//! # Invariants
//! - The owning `employee_id` column is written once at insert and never
//!   touched by update (the one-to-one pairing is fixed).
//! - Soft delete sets the tombstone and forces `status` to inactive in the
//!   same statement.

use crate::db::provider::ConnectionProvider;
use crate::db::scope::TxScope;
use crate::model::employee::EmployeeId;
use crate::model::file::{ContractStatus, FileId, PersonnelFile};
use crate::model::RecordMeta;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const FILE_SELECT_SQL: &str = "SELECT
    id,
    file_number,
    category,
    status,
    opened_on,
    notes
 FROM personnel_files";

/// Repository interface for personnel-file persistence.
///
/// Every write comes in a self-contained form (own connection, implicit
/// transaction) and a participating form running on an external [`TxScope`].
pub trait FileRepository {
    fn create(&self, file: &PersonnelFile, employee_id: EmployeeId) -> RepoResult<FileId>;
    fn create_in_scope(
        &self,
        file: &PersonnelFile,
        employee_id: EmployeeId,
        scope: &TxScope,
    ) -> RepoResult<FileId>;
    fn update(&self, file: &PersonnelFile) -> RepoResult<()>;
    fn update_in_scope(&self, file: &PersonnelFile, scope: &TxScope) -> RepoResult<()>;
    fn soft_delete(&self, id: FileId) -> RepoResult<()>;
    fn soft_delete_in_scope(&self, id: FileId, scope: &TxScope) -> RepoResult<()>;
    fn find_by_id(&self, id: FileId) -> RepoResult<Option<PersonnelFile>>;
    fn find_all(&self) -> RepoResult<Vec<PersonnelFile>>;
    fn find_by_number(&self, file_number: &str) -> RepoResult<Option<PersonnelFile>>;
    fn find_by_status(&self, status: ContractStatus) -> RepoResult<Vec<PersonnelFile>>;
}

/// SQLite-backed personnel-file repository.
pub struct SqliteFileRepository<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteFileRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> FileRepository for SqliteFileRepository<P> {
    fn create(&self, file: &PersonnelFile, employee_id: EmployeeId) -> RepoResult<FileId> {
        let conn = self.provider.acquire()?;
        insert_file(&conn, file, employee_id)
    }

    fn create_in_scope(
        &self,
        file: &PersonnelFile,
        employee_id: EmployeeId,
        scope: &TxScope,
    ) -> RepoResult<FileId> {
        insert_file(scope.conn(), file, employee_id)
    }

    fn update(&self, file: &PersonnelFile) -> RepoResult<()> {
        let conn = self.provider.acquire()?;
        update_file(&conn, file)
    }

    fn update_in_scope(&self, file: &PersonnelFile, scope: &TxScope) -> RepoResult<()> {
        update_file(scope.conn(), file)
    }

    fn soft_delete(&self, id: FileId) -> RepoResult<()> {
        let conn = self.provider.acquire()?;
        soft_delete_file(&conn, id)
    }

    fn soft_delete_in_scope(&self, id: FileId, scope: &TxScope) -> RepoResult<()> {
        soft_delete_file(scope.conn(), id)
    }

    fn find_by_id(&self, id: FileId) -> RepoResult<Option<PersonnelFile>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(&format!(
            "{FILE_SELECT_SQL}
             WHERE id = ?1
               AND is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_file_row(row)?));
        }
        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<PersonnelFile>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(&format!(
            "{FILE_SELECT_SQL}
             WHERE is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut files = Vec::new();
        while let Some(row) = rows.next()? {
            files.push(parse_file_row(row)?);
        }
        Ok(files)
    }

    fn find_by_number(&self, file_number: &str) -> RepoResult<Option<PersonnelFile>> {
        let trimmed = file_number.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(&format!(
            "{FILE_SELECT_SQL}
             WHERE file_number = ?1
               AND is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([trimmed])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_file_row(row)?));
        }
        Ok(None)
    }

    fn find_by_status(&self, status: ContractStatus) -> RepoResult<Vec<PersonnelFile>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(&format!(
            "{FILE_SELECT_SQL}
             WHERE status = ?1
               AND is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([status_to_db(status)])?;
        let mut files = Vec::new();
        while let Some(row) = rows.next()? {
            files.push(parse_file_row(row)?);
        }
        Ok(files)
    }
}

fn insert_file(conn: &Connection, file: &PersonnelFile, employee_id: EmployeeId) -> RepoResult<FileId> {
    let changed = conn.execute(
        "INSERT INTO personnel_files (
            file_number,
            category,
            status,
            opened_on,
            notes,
            employee_id,
            is_deleted
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0);",
        params![
            file.file_number.as_str(),
            file.category.as_deref(),
            status_to_db(file.status),
            file.opened_on.as_deref(),
            file.notes.as_deref(),
            employee_id,
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::MissingGeneratedId("personnel file"));
    }
    let id = conn.last_insert_rowid();
    if id <= 0 {
        return Err(RepoError::MissingGeneratedId("personnel file"));
    }
    Ok(id)
}

fn update_file(conn: &Connection, file: &PersonnelFile) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE personnel_files
         SET
            file_number = ?1,
            category = ?2,
            status = ?3,
            opened_on = ?4,
            notes = ?5
         WHERE id = ?6
           AND is_deleted = 0;",
        params![
            file.file_number.as_str(),
            file.category.as_deref(),
            status_to_db(file.status),
            file.opened_on.as_deref(),
            file.notes.as_deref(),
            file.meta.id,
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: "personnel file",
            id: file.meta.id,
        });
    }
    Ok(())
}

fn soft_delete_file(conn: &Connection, id: FileId) -> RepoResult<()> {
    // A retired file is by definition out of contract; the tombstone and the
    // status flip must land in one statement.
    let changed = conn.execute(
        "UPDATE personnel_files
         SET
            is_deleted = 1,
            status = 'inactive'
         WHERE id = ?1
           AND is_deleted = 0;",
        [id],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: "personnel file",
            id,
        });
    }
    Ok(())
}

fn parse_file_row(row: &Row<'_>) -> RepoResult<PersonnelFile> {
    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid contract status `{status_text}` in personnel_files.status"
        ))
    })?;

    Ok(PersonnelFile {
        meta: RecordMeta {
            id: row.get("id")?,
            is_deleted: false,
        },
        file_number: row.get("file_number")?,
        category: row.get("category")?,
        status,
        opened_on: row.get("opened_on")?,
        notes: row.get("notes")?,
    })
}

pub(crate) fn status_to_db(status: ContractStatus) -> &'static str {
    match status {
        ContractStatus::Active => "active",
        ContractStatus::Inactive => "inactive",
    }
}

pub(crate) fn parse_status(value: &str) -> Option<ContractStatus> {
    match value {
        "active" => Some(ContractStatus::Active),
        "inactive" => Some(ContractStatus::Inactive),
        _ => None,
    }
}
