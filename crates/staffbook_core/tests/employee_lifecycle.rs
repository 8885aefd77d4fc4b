use rusqlite::Connection;
use staffbook_core::{
    ConnectionProvider, ContractStatus, Employee, EmployeeService, EmployeeServiceError,
    FileDbProvider, FileService, FileServiceError, PersonnelFile, SqliteEmployeeRepository,
    SqliteFileRepository,
};
use tempfile::TempDir;

type Service = EmployeeService<
    FileDbProvider,
    SqliteEmployeeRepository<FileDbProvider>,
    SqliteFileRepository<FileDbProvider>,
>;

fn setup() -> (TempDir, Service, FileDbProvider) {
    let dir = tempfile::tempdir().unwrap();
    let provider = FileDbProvider::new(dir.path().join("staffbook.db"));
    let service = EmployeeService::new(
        provider.clone(),
        SqliteEmployeeRepository::new(provider.clone()),
        FileService::new(SqliteFileRepository::new(provider.clone())),
    );
    (dir, service, provider)
}

fn sample_employee(national_id: &str, file_number: &str) -> Employee {
    let mut employee = Employee::new("Ana", "Gomez", national_id);
    employee.email = Some("ana.gomez@example.com".to_string());
    employee.hired_on = Some("2023-04-01".to_string());
    employee.department = Some("Accounting".to_string());
    let mut file = PersonnelFile::new(file_number, ContractStatus::Active);
    file.category = Some("Senior".to_string());
    file.opened_on = Some("2023-04-01".to_string());
    file.notes = Some("initial intake".to_string());
    employee.file = Some(file);
    employee
}

#[test]
fn create_and_get_roundtrip() {
    let (_dir, service, _provider) = setup();

    let mut employee = sample_employee("30111222", "L-001");
    service.create(&mut employee).unwrap();
    assert!(employee.meta.is_persisted());
    let file_id = employee.file.as_ref().unwrap().meta.id;
    assert!(file_id > 0);

    let loaded = service.get(employee.meta.id).unwrap();
    assert_eq!(loaded.first_name, "Ana");
    assert_eq!(loaded.last_name, "Gomez");
    assert_eq!(loaded.national_id, "30111222");
    assert_eq!(loaded.email.as_deref(), Some("ana.gomez@example.com"));
    assert_eq!(loaded.hired_on.as_deref(), Some("2023-04-01"));
    assert_eq!(loaded.department.as_deref(), Some("Accounting"));

    let loaded_file = loaded.file.expect("file must hydrate with the employee");
    assert_eq!(loaded_file.meta.id, file_id);
    assert_eq!(loaded_file.file_number, "L-001");
    assert_eq!(loaded_file.status, ContractStatus::Active);
    assert_eq!(loaded_file.category.as_deref(), Some("Senior"));
    assert_eq!(loaded_file.notes.as_deref(), Some("initial intake"));
}

#[test]
fn get_unknown_id_reports_not_found() {
    let (_dir, service, _provider) = setup();

    let err = service.get(42).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::NotFound(42)));

    let err = service.get(0).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::InvalidId(0)));
}

#[test]
fn duplicate_national_id_is_rejected_without_touching_either_table() {
    let (_dir, service, provider) = setup();

    let mut first = sample_employee("30111222", "L-001");
    service.create(&mut first).unwrap();

    let mut second = sample_employee("30111222", "L-002");
    let err = service.create(&mut second).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::DuplicateNationalId(id) if id == "30111222"));
    assert!(!second.meta.is_persisted());

    let conn = provider.acquire().unwrap();
    assert_eq!(count_rows(&conn, "employees"), 1);
    assert_eq!(count_rows(&conn, "personnel_files"), 1);
}

#[test]
fn failing_file_step_rolls_back_the_employee_insert() {
    let (_dir, service, provider) = setup();

    let mut first = sample_employee("30111222", "L-001");
    service.create(&mut first).unwrap();

    // Distinct national id, clashing file number: the employee row is
    // inserted first, then the file step fails and the scope must undo it.
    let mut second = sample_employee("30999888", "L-001");
    let err = service.create(&mut second).unwrap_err();
    assert!(matches!(
        err,
        EmployeeServiceError::File(FileServiceError::DuplicateFileNumber(number)) if number == "L-001"
    ));

    let conn = provider.acquire().unwrap();
    assert_eq!(count_rows(&conn, "employees"), 1);
    assert_eq!(count_rows(&conn, "personnel_files"), 1);
    assert!(service.get_by_national_id("30999888").is_err());
}

#[test]
fn create_without_file_is_rejected_before_storage() {
    let (_dir, service, provider) = setup();

    let mut employee = Employee::new("Ana", "Gomez", "30111222");
    let err = service.create(&mut employee).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::MissingFile));

    let conn = provider.acquire().unwrap();
    assert_eq!(count_rows(&conn, "employees"), 0);
}

#[test]
fn update_changes_both_records_under_one_scope() {
    let (_dir, service, _provider) = setup();

    let mut employee = sample_employee("30111222", "L-001");
    service.create(&mut employee).unwrap();

    employee.department = Some("Legal".to_string());
    if let Some(file) = employee.file.as_mut() {
        file.status = ContractStatus::Inactive;
        file.notes = Some("moved to legal".to_string());
    }
    service.update(&employee).unwrap();

    let loaded = service.get(employee.meta.id).unwrap();
    assert_eq!(loaded.department.as_deref(), Some("Legal"));
    let file = loaded.file.unwrap();
    assert_eq!(file.status, ContractStatus::Inactive);
    assert_eq!(file.notes.as_deref(), Some("moved to legal"));
}

#[test]
fn update_requires_persisted_pair() {
    let (_dir, service, _provider) = setup();

    let unpersisted = sample_employee("30111222", "L-001");
    let err = service.update(&unpersisted).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::InvalidId(0)));

    let mut created = sample_employee("30111222", "L-001");
    service.create(&mut created).unwrap();

    let mut without_file = created.clone();
    without_file.file = None;
    let err = service.update(&without_file).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::MissingFile));

    let mut fresh_file = created.clone();
    if let Some(file) = fresh_file.file.as_mut() {
        file.meta.id = 0;
    }
    let err = service.update(&fresh_file).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::MissingFileId));
}

#[test]
fn failed_employee_update_rolls_back_the_file_write() {
    let (_dir, service, _provider) = setup();

    let mut employee = sample_employee("30111222", "L-001");
    service.create(&mut employee).unwrap();
    let real_id = employee.meta.id;

    // Point the employee row at an id that does not exist: the file update
    // lands first inside the scope, then the employee step fails.
    let mut phantom = employee.clone();
    phantom.meta.id = real_id + 1000;
    phantom.national_id = "30999888".to_string();
    if let Some(file) = phantom.file.as_mut() {
        file.status = ContractStatus::Inactive;
    }
    let err = service.update(&phantom).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::Repo(_)));

    let loaded = service.get(real_id).unwrap();
    assert_eq!(
        loaded.file.unwrap().status,
        ContractStatus::Active,
        "file change must not survive the failed employee step"
    );
}

#[test]
fn delete_soft_deletes_both_rows_and_forces_inactive_status() {
    let (_dir, service, provider) = setup();
    let files = FileService::new(SqliteFileRepository::new(provider.clone()));

    let mut employee = sample_employee("30111222", "L-001");
    service.create(&mut employee).unwrap();
    let employee_id = employee.meta.id;
    let file_id = employee.file.as_ref().unwrap().meta.id;

    service.delete(employee_id).unwrap();

    assert!(matches!(
        service.get(employee_id).unwrap_err(),
        EmployeeServiceError::NotFound(id) if id == employee_id
    ));
    assert!(matches!(
        files.get_by_id(file_id).unwrap_err(),
        FileServiceError::NotFound(id) if id == file_id
    ));

    // The rows stay physically present, tombstoned, and the file status is
    // forced to inactive.
    let conn = provider.acquire().unwrap();
    let employee_flag: i64 = conn
        .query_row(
            "SELECT is_deleted FROM employees WHERE id = ?1;",
            [employee_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(employee_flag, 1);
    let (file_flag, status): (i64, String) = conn
        .query_row(
            "SELECT is_deleted, status FROM personnel_files WHERE id = ?1;",
            [file_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(file_flag, 1);
    assert_eq!(status, "inactive");
}

#[test]
fn delete_validates_input_and_reports_missing_employee() {
    let (_dir, service, _provider) = setup();

    assert!(matches!(
        service.delete(-3).unwrap_err(),
        EmployeeServiceError::InvalidId(-3)
    ));
    assert!(matches!(
        service.delete(77).unwrap_err(),
        EmployeeServiceError::NotFound(77)
    ));
}

#[test]
fn delete_reports_integrity_error_for_employee_without_file() {
    let (_dir, service, provider) = setup();

    // Bypass the coordinator to plant the corrupt state: an employee row
    // with no personnel file at all.
    use staffbook_core::EmployeeRepository;
    let repo = SqliteEmployeeRepository::new(provider.clone());
    let orphan = Employee::new("Solo", "Row", "40555666");
    let orphan_id = repo.create(&orphan).unwrap();

    let err = service.delete(orphan_id).unwrap_err();
    assert!(matches!(err, EmployeeServiceError::Integrity(id) if id == orphan_id));
}

#[test]
fn national_id_is_reusable_after_logical_deletion() {
    let (_dir, service, _provider) = setup();

    let mut first = sample_employee("30111222", "L-001");
    service.create(&mut first).unwrap();
    service.delete(first.meta.id).unwrap();

    let mut second = sample_employee("30111222", "L-002");
    service.create(&mut second).unwrap();
    assert!(second.meta.is_persisted());
    assert_ne!(first.meta.id, second.meta.id);
}

#[test]
fn get_by_national_id_validates_and_looks_up() {
    let (_dir, service, _provider) = setup();

    let mut employee = sample_employee("30111222", "L-001");
    service.create(&mut employee).unwrap();

    let found = service.get_by_national_id(" 30111222 ").unwrap();
    assert_eq!(found.meta.id, employee.meta.id);

    assert!(matches!(
        service.get_by_national_id("99999999").unwrap_err(),
        EmployeeServiceError::UnknownNationalId(id) if id == "99999999"
    ));
    assert!(matches!(
        service.get_by_national_id("   ").unwrap_err(),
        EmployeeServiceError::Validation(_)
    ));
}

#[test]
fn search_by_name_matches_substrings_case_insensitively() {
    let (_dir, service, _provider) = setup();

    let mut ana = sample_employee("30111222", "L-001");
    service.create(&mut ana).unwrap();

    let mut marta = Employee::new("Marta", "Garcia", "30333444");
    marta.file = Some(PersonnelFile::new("L-002", ContractStatus::Active));
    service.create(&mut marta).unwrap();

    let by_first = service.search_by_name("an").unwrap();
    assert_eq!(by_first.len(), 1);
    assert_eq!(by_first[0].national_id, "30111222");

    let by_last = service.search_by_name("GAR").unwrap();
    assert_eq!(by_last.len(), 1);
    assert_eq!(by_last[0].national_id, "30333444");

    assert!(service.search_by_name("   ").unwrap().is_empty());
    assert!(service.search_by_name("zzz").unwrap().is_empty());
}

#[test]
fn get_all_hydrates_files_and_skips_deleted_employees() {
    let (_dir, service, _provider) = setup();

    let mut ana = sample_employee("30111222", "L-001");
    service.create(&mut ana).unwrap();
    let mut marta = sample_employee("30333444", "L-002");
    service.create(&mut marta).unwrap();
    service.delete(marta.meta.id).unwrap();

    let all = service.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].national_id, "30111222");
    assert!(all[0].file.is_some());
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
