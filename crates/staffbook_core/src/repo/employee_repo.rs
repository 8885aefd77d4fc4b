//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate employee records to/from `employees` rows.
//! - Hydrate the owned personnel file through one joined round trip.
//!
//! # Invariants
//! - Every read joins `personnel_files` filtered to non-deleted rows, so a
//!   loaded employee either carries its file or makes the inconsistency
//!   visible as `file: None`.
//! - Natural-key and name searches short-circuit on blank input without
//!   querying storage.

use crate::db::provider::ConnectionProvider;
use crate::db::scope::TxScope;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::file::PersonnelFile;
use crate::model::RecordMeta;
use crate::repo::file_repo::parse_status;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    e.id AS emp_id,
    e.first_name,
    e.last_name,
    e.national_id,
    e.email,
    e.hired_on,
    e.department,
    f.id AS file_id,
    f.file_number,
    f.category,
    f.status,
    f.opened_on,
    f.notes
 FROM employees e
 LEFT JOIN personnel_files f
        ON f.employee_id = e.id
       AND f.is_deleted = 0";

/// Repository interface for employee persistence.
///
/// Every write comes in a self-contained form (own connection, implicit
/// transaction) and a participating form running on an external [`TxScope`].
pub trait EmployeeRepository {
    /// Inserts the employee row only; the generated id is returned so the
    /// coordinator can pair the personnel file to it.
    fn create(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    fn create_in_scope(&self, employee: &Employee, scope: &TxScope) -> RepoResult<EmployeeId>;
    fn update(&self, employee: &Employee) -> RepoResult<()>;
    fn update_in_scope(&self, employee: &Employee, scope: &TxScope) -> RepoResult<()>;
    fn soft_delete(&self, id: EmployeeId) -> RepoResult<()>;
    fn soft_delete_in_scope(&self, id: EmployeeId, scope: &TxScope) -> RepoResult<()>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn find_all(&self) -> RepoResult<Vec<Employee>>;
    fn find_by_national_id(&self, national_id: &str) -> RepoResult<Option<Employee>>;
    /// Case-insensitive substring match over first or last name.
    fn search_by_name(&self, text: &str) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteEmployeeRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> EmployeeRepository for SqliteEmployeeRepository<P> {
    fn create(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        let conn = self.provider.acquire()?;
        insert_employee(&conn, employee)
    }

    fn create_in_scope(&self, employee: &Employee, scope: &TxScope) -> RepoResult<EmployeeId> {
        insert_employee(scope.conn(), employee)
    }

    fn update(&self, employee: &Employee) -> RepoResult<()> {
        let conn = self.provider.acquire()?;
        update_employee(&conn, employee)
    }

    fn update_in_scope(&self, employee: &Employee, scope: &TxScope) -> RepoResult<()> {
        update_employee(scope.conn(), employee)
    }

    fn soft_delete(&self, id: EmployeeId) -> RepoResult<()> {
        let conn = self.provider.acquire()?;
        soft_delete_employee(&conn, id)
    }

    fn soft_delete_in_scope(&self, id: EmployeeId, scope: &TxScope) -> RepoResult<()> {
        soft_delete_employee(scope.conn(), id)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE e.id = ?1
               AND e.is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE e.is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn find_by_national_id(&self, national_id: &str) -> RepoResult<Option<Employee>> {
        let trimmed = national_id.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE e.national_id = ?1
               AND e.is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([trimmed])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn search_by_name(&self, text: &str) -> RepoResult<Vec<Employee>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{trimmed}%");

        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE (e.first_name LIKE ?1 OR e.last_name LIKE ?1)
               AND e.is_deleted = 0;"
        ))?;

        let mut rows = stmt.query([pattern.as_str()])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }
}

fn insert_employee(conn: &Connection, employee: &Employee) -> RepoResult<EmployeeId> {
    let changed = conn.execute(
        "INSERT INTO employees (
            first_name,
            last_name,
            national_id,
            email,
            hired_on,
            department,
            is_deleted
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0);",
        params![
            employee.first_name.as_str(),
            employee.last_name.as_str(),
            employee.national_id.as_str(),
            employee.email.as_deref(),
            employee.hired_on.as_deref(),
            employee.department.as_deref(),
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::MissingGeneratedId("employee"));
    }
    let id = conn.last_insert_rowid();
    if id <= 0 {
        return Err(RepoError::MissingGeneratedId("employee"));
    }
    Ok(id)
}

fn update_employee(conn: &Connection, employee: &Employee) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE employees
         SET
            first_name = ?1,
            last_name = ?2,
            national_id = ?3,
            email = ?4,
            hired_on = ?5,
            department = ?6
         WHERE id = ?7
           AND is_deleted = 0;",
        params![
            employee.first_name.as_str(),
            employee.last_name.as_str(),
            employee.national_id.as_str(),
            employee.email.as_deref(),
            employee.hired_on.as_deref(),
            employee.department.as_deref(),
            employee.meta.id,
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: "employee",
            id: employee.meta.id,
        });
    }
    Ok(())
}

fn soft_delete_employee(conn: &Connection, id: EmployeeId) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE employees
         SET is_deleted = 1
         WHERE id = ?1
           AND is_deleted = 0;",
        [id],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: "employee",
            id,
        });
    }
    Ok(())
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let file = match row.get::<_, Option<i64>>("file_id")? {
        Some(file_id) => {
            let status_text: String = row.get("status")?;
            let status = parse_status(&status_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid contract status `{status_text}` in personnel_files.status"
                ))
            })?;
            Some(PersonnelFile {
                meta: RecordMeta {
                    id: file_id,
                    is_deleted: false,
                },
                file_number: row.get("file_number")?,
                category: row.get("category")?,
                status,
                opened_on: row.get("opened_on")?,
                notes: row.get("notes")?,
            })
        }
        None => None,
    };

    Ok(Employee {
        meta: RecordMeta {
            id: row.get("emp_id")?,
            is_deleted: false,
        },
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        national_id: row.get("national_id")?,
        email: row.get("email")?,
        hired_on: row.get("hired_on")?,
        department: row.get("department")?,
        file,
    })
}
