use chrono::NaiveDate;
use ems_core::{
    seed_demo_data, AttendanceFields, DeletePolicy, ErrorKind, RecordStore, RepoError,
    StoreConfig, Table,
};

fn seeded(policy: DeletePolicy) -> RecordStore {
    let store = RecordStore::open(StoreConfig::in_memory().with_delete_policy(policy)).unwrap();
    seed_demo_data(&store).unwrap();
    store
}

#[test]
fn restrict_rejects_deleting_referenced_department() {
    let store = seeded(DeletePolicy::Restrict);

    let err = store.delete_department(1).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Referenced {
            table: Table::Department,
            key: 1,
            referenced_by: Table::Position,
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(store.get_department(1).unwrap().is_some());

    // Finance (3) is referenced only by the Accountant position.
    store.delete_position(4).unwrap();
    store.delete_department(3).unwrap();
    assert!(store.get_department(3).unwrap().is_none());
}

#[test]
fn leave_dangling_deletes_and_enrichment_becomes_none() {
    let store = seeded(DeletePolicy::LeaveDangling);

    store.delete_department(1).unwrap();

    let employees = store.list_employees().unwrap();
    assert_eq!(employees.len(), 2);
    for employee in &employees {
        assert_eq!(employee.fields.department_id, Some(1));
        assert_eq!(employee.dept_name, None);
    }
}

#[test]
fn restrict_rejects_deleting_position_held_by_employee() {
    let store = seeded(DeletePolicy::Restrict);

    let err = store.delete_position(1).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Referenced {
            table: Table::Position,
            key: 1,
            referenced_by: Table::Employee,
        }
    ));

    // HR Specialist is unassigned.
    store.delete_position(3).unwrap();
}

#[test]
fn restrict_rejects_deleting_employee_with_attendance() {
    let store = seeded(DeletePolicy::Restrict);
    store
        .create_attendance(&AttendanceFields {
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            status: "Present".to_string(),
        })
        .unwrap();

    let err = store.delete_employee(1).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Referenced {
            table: Table::Employee,
            referenced_by: Table::Attendance,
            ..
        }
    ));
    store.delete_employee(2).unwrap();
    assert!(store.get_employee(2).unwrap().is_none());
}

#[test]
fn restrict_ignores_missing_keys() {
    let store = seeded(DeletePolicy::Restrict);
    store.delete_department(999).unwrap();
    store.delete_employee(999).unwrap();
}

#[test]
fn leave_dangling_position_delete_clears_position_name() {
    let store = seeded(DeletePolicy::LeaveDangling);

    store.delete_position(1).unwrap();

    let john = store.get_employee(1).unwrap().unwrap();
    assert_eq!(john.fields.position_id, Some(1));
    assert_eq!(john.position_name, None);
    assert_eq!(john.dept_name.as_deref(), Some("IT"));
}
