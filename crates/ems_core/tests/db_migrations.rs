use ems_core::db::migrations::latest_version;
use ems_core::db::{open_db, open_db_in_memory, DbError};
use ems_core::repo::department_repo::SqliteDepartmentRepository;
use ems_core::{RecordStore, RepoError, Table};
use rusqlite::Connection;

const LEGACY_SCHEMA: &str = include_str!("../src/db/migrations/0001_legacy_tables.sql");

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in Table::ALL {
        assert_table_exists(&conn, table.name());
    }
    assert_column_exists(&conn, "Employee_details", "PositionID");
}

#[test]
fn opening_same_database_twice_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ems.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO Department (DeptName, Location) VALUES ('IT', 'Floor 1');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM Department;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn legacy_database_is_adopted_and_position_ids_backfilled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let legacy = Connection::open(&path).unwrap();
    legacy.execute_batch(LEGACY_SCHEMA).unwrap();
    legacy
        .execute_batch(
            "INSERT INTO Department (DeptName, Location) VALUES ('IT', 'Floor 1');
             INSERT INTO Position (PositionName, DepartmentID) VALUES ('Developer', 1);
             INSERT INTO Position (PositionName, DepartmentID) VALUES ('Manager', 1);
             INSERT INTO Position (PositionName, DepartmentID) VALUES ('Developer', 1);
             INSERT INTO Employee_details (EmployeeName, HireDate, Position, DepartmentID)
                 VALUES ('John Doe', '2020-01-15', 'Developer', 1);
             INSERT INTO Employee_details (EmployeeName, HireDate, Position, DepartmentID)
                 VALUES ('Jane Smith', '2019-03-20', 'Manager', 1);
             INSERT INTO Employee_details (EmployeeName, HireDate, Position, DepartmentID)
                 VALUES ('Sam Roe', '2021-07-01', 'Intern', 1);",
        )
        .unwrap();
    assert_eq!(schema_version(&legacy), 0);
    drop(legacy);

    let store = RecordStore::initialize(&path).unwrap();
    let employees = store.list_employees().unwrap();
    assert_eq!(employees.len(), 3);

    // Duplicate names resolve to the lowest id.
    assert_eq!(employees[0].fields.position_id, Some(1));
    assert_eq!(employees[0].position_name.as_deref(), Some("Developer"));
    assert_eq!(employees[1].fields.position_id, Some(2));
    assert_eq!(employees[1].position_name.as_deref(), Some("Manager"));
    // Unknown legacy names stay unlinked rather than failing the upgrade.
    assert_eq!(employees[2].fields.position_id, None);
    assert_eq!(employees[2].position_name, None);
    assert_eq!(employees[2].fields.name, "Sam Roe");
    assert_eq!(employees[2].fields.email, "");

    store.close().unwrap();
}

#[test]
fn legacy_blank_references_read_as_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy_form.db");

    // The legacy forms posted every field as text, unselected ones as ''.
    let legacy = Connection::open(&path).unwrap();
    legacy.execute_batch(LEGACY_SCHEMA).unwrap();
    legacy
        .execute_batch(
            "INSERT INTO Department (DeptName, Location) VALUES ('IT', 'Floor 1');
             INSERT INTO Position (PositionName, DepartmentID) VALUES ('Developer', '');
             INSERT INTO Employee_details (EmployeeName, HireDate, Position, DepartmentID, TeamID)
                 VALUES ('John Doe', '2020-01-15', 'Developer', '1', '1');
             INSERT INTO Employee_details (EmployeeName, HireDate, Position, DepartmentID, TeamID)
                 VALUES ('Jane Smith', '2019-03-20', '', '', '');
             INSERT INTO Project (EmployeeID, TeamID, ProjectID, Task, Status, Sprint)
                 VALUES (1, 1, 'P-1', 'Build', 'Open', '');",
        )
        .unwrap();
    drop(legacy);

    let store = RecordStore::initialize(&path).unwrap();
    let employees = store.list_employees().unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].fields.department_id, Some(1));
    assert_eq!(employees[0].fields.team_id, Some(1));
    assert_eq!(employees[0].dept_name.as_deref(), Some("IT"));
    assert_eq!(employees[1].fields.name, "Jane Smith");
    assert_eq!(employees[1].fields.department_id, None);
    assert_eq!(employees[1].fields.team_id, None);
    assert_eq!(employees[1].fields.position_id, None);
    assert_eq!(employees[1].dept_name, None);

    let positions = store.list_positions().unwrap();
    assert_eq!(positions[0].fields.department_id, None);

    let projects = store.list_projects().unwrap();
    assert_eq!(projects[0].fields.sprint, 0);

    store.close().unwrap();
}

#[test]
fn legacy_malformed_date_is_reported_with_its_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy_dates.db");

    let legacy = Connection::open(&path).unwrap();
    legacy.execute_batch(LEGACY_SCHEMA).unwrap();
    legacy
        .execute_batch(
            "INSERT INTO Attendance (EmployeeID, Date, Status) VALUES (1, '2024-01-02', 'Present');
             INSERT INTO Attendance (EmployeeID, Date, Status) VALUES ('1', '', 'Absent');",
        )
        .unwrap();
    drop(legacy);

    let store = RecordStore::initialize(&path).unwrap();
    let err = store.list_attendance().unwrap_err();
    match err {
        RepoError::InvalidData(message) => {
            assert!(message.starts_with("Attendance row 2:"), "{message}");
            assert!(message.contains("Attendance.Date"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }

    // The well-formed row stays reachable by key.
    let first = store.get_attendance(1).unwrap().unwrap();
    assert_eq!(first.fields.status, "Present");
    assert!(matches!(
        store.get_attendance(2),
        Err(RepoError::InvalidData(_))
    ));

    store.close().unwrap();
}

#[test]
fn repository_try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteDepartmentRepository::try_new(&conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(err, RepoError::UninitializedConnection { .. }));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

fn assert_column_exists(conn: &Connection, table_name: &str, column: &str) {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table_name});"))
        .unwrap();
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(
        columns.iter().any(|name| name == column),
        "column {table_name}.{column} does not exist"
    );
}
