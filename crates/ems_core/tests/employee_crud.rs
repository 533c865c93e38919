use chrono::NaiveDate;
use ems_core::{
    DepartmentFields, EmployeeFields, PositionFields, RecordStore, RepoError, StoreConfig, Table,
};

fn store() -> RecordStore {
    RecordStore::open(StoreConfig::in_memory()).unwrap()
}

fn employee(name: &str, department_id: Option<i64>, position_id: Option<i64>) -> EmployeeFields {
    EmployeeFields {
        name: name.to_string(),
        hire_date: NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
        experience: "5 years".to_string(),
        position_id,
        gender: "Male".to_string(),
        department_id,
        email: "john@example.com".to_string(),
        phone: "1234567890".to_string(),
        status: "Active".to_string(),
        date_of_birth: "1990-05-10".to_string(),
        salary: "50000".to_string(),
        team_id: Some(1),
    }
}

#[test]
fn list_enriches_department_and_position_names() {
    let store = store();
    let it = store
        .create_department(&DepartmentFields::new("IT", "Floor 1"))
        .unwrap();
    let developer = store
        .create_position(&PositionFields::new("Developer", Some(it)))
        .unwrap();
    let john = store
        .create_employee(&employee("John Doe", Some(it), Some(developer)))
        .unwrap();

    let employees = store.list_employees().unwrap();
    assert_eq!(employees.len(), 1);
    let record = &employees[0];
    assert_eq!(record.id, john);
    assert_eq!(record.dept_name.as_deref(), Some("IT"));
    assert_eq!(record.position_name.as_deref(), Some("Developer"));
    assert_eq!(record.fields, employee("John Doe", Some(it), Some(developer)));
}

#[test]
fn employees_without_references_are_still_listed() {
    let store = store();
    let id = store.create_employee(&employee("Jane Smith", None, None)).unwrap();

    let employees = store.list_employees().unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].id, id);
    assert_eq!(employees[0].dept_name, None);
    assert_eq!(employees[0].position_name, None);
}

#[test]
fn update_replaces_every_field() {
    let store = store();
    let it = store
        .create_department(&DepartmentFields::new("IT", "Floor 1"))
        .unwrap();
    let hr = store
        .create_department(&DepartmentFields::new("HR", "Floor 2"))
        .unwrap();
    let manager = store
        .create_position(&PositionFields::new("Manager", Some(hr)))
        .unwrap();
    let id = store.create_employee(&employee("John Doe", Some(it), None)).unwrap();

    let replacement = EmployeeFields {
        name: "John Q. Doe".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
        experience: "6 years".to_string(),
        position_id: Some(manager),
        gender: "Male".to_string(),
        department_id: Some(hr),
        email: "jqd@example.com".to_string(),
        phone: "5550001".to_string(),
        status: "On Leave".to_string(),
        date_of_birth: "1990-05-10".to_string(),
        salary: "65000".to_string(),
        team_id: None,
    };
    store.update_employee(id, &replacement).unwrap();

    let loaded = store.get_employee(id).unwrap().unwrap();
    assert_eq!(loaded.fields, replacement);
    assert_eq!(loaded.dept_name.as_deref(), Some("HR"));
    assert_eq!(loaded.position_name.as_deref(), Some("Manager"));
}

#[test]
fn unknown_references_are_rejected_on_write() {
    let store = store();

    let err = store
        .create_employee(&employee("John Doe", Some(3), None))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::MissingReference {
            table: Table::Department,
            key: 3
        }
    ));

    let err = store
        .create_employee(&employee("John Doe", None, Some(8)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::MissingReference {
            table: Table::Position,
            key: 8
        }
    ));
    assert!(store.list_employees().unwrap().is_empty());
}

#[test]
fn position_rename_flows_into_employee_reads_and_legacy_column() {
    let store = store();
    let it = store
        .create_department(&DepartmentFields::new("IT", "Floor 1"))
        .unwrap();
    let developer = store
        .create_position(&PositionFields::new("Developer", Some(it)))
        .unwrap();
    let id = store
        .create_employee(&employee("John Doe", Some(it), Some(developer)))
        .unwrap();

    store
        .update_position(developer, &PositionFields::new("Senior Developer", Some(it)))
        .unwrap();

    let loaded = store.get_employee(id).unwrap().unwrap();
    assert_eq!(loaded.position_name.as_deref(), Some("Senior Developer"));

    let dir = tempfile::tempdir().unwrap();
    let paths = ems_core::export_csv(&store, dir.path()).unwrap();
    let employees_csv = paths
        .iter()
        .find(|path| path.ends_with("Employee_details.csv"))
        .unwrap();
    let contents = std::fs::read_to_string(employees_csv).unwrap();
    assert!(contents.contains("Senior Developer"));
}

#[test]
fn delete_then_get_returns_none() {
    let store = store();
    let id = store.create_employee(&employee("John Doe", None, None)).unwrap();

    store.delete_employee(id).unwrap();
    assert!(store.get_employee(id).unwrap().is_none());
    store.delete_employee(id).unwrap();
}

#[test]
fn serialized_record_uses_legacy_column_names() {
    let store = store();
    let it = store
        .create_department(&DepartmentFields::new("IT", "Floor 1"))
        .unwrap();
    let id = store.create_employee(&employee("John Doe", Some(it), None)).unwrap();

    let record = store.get_employee(id).unwrap().unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["EmployeeID"], id);
    assert_eq!(json["EmployeeName"], "John Doe");
    assert_eq!(json["HireDate"], "2020-01-15");
    assert_eq!(json["DepartmentID"], it);
    assert_eq!(json["DeptName"], "IT");
    assert!(json["PositionName"].is_null());
}
