use ems_core::{ErrorKind, ProjectFields, ProjectKey, RecordStore, RepoError, StoreConfig};

fn store() -> RecordStore {
    RecordStore::open(StoreConfig::in_memory()).unwrap()
}

fn project(code: &str, sprint: i64) -> ProjectFields {
    ProjectFields {
        project_code: code.to_string(),
        task: "Build payroll report".to_string(),
        status: "In Progress".to_string(),
        sprint,
    }
}

#[test]
fn second_project_for_same_pair_is_rejected() {
    let store = store();
    let key = ProjectKey::new(1, 1);

    store.create_project(key, &project("P-100", 1)).unwrap();
    let err = store.create_project(key, &project("P-200", 2)).unwrap_err();

    assert!(matches!(err, RepoError::DuplicateProjectKey(duplicate) if duplicate == key));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let projects = store.list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].fields.project_code, "P-100");
}

#[test]
fn project_code_must_be_unique_across_pairs() {
    let store = store();

    store
        .create_project(ProjectKey::new(1, 1), &project("P-100", 1))
        .unwrap();
    let err = store
        .create_project(ProjectKey::new(2, 1), &project("P-100", 1))
        .unwrap_err();

    assert!(matches!(err, RepoError::DuplicateProjectCode(ref code) if code == "P-100"));
    assert!(store.get_project(ProjectKey::new(2, 1)).unwrap().is_none());
}

#[test]
fn update_replaces_fields_but_not_key() {
    let store = store();
    let key = ProjectKey::new(3, 7);
    store.create_project(key, &project("P-300", 1)).unwrap();

    let updated = ProjectFields {
        project_code: "P-301".to_string(),
        task: "Ship payroll report".to_string(),
        status: "Done".to_string(),
        sprint: 4,
    };
    store.update_project(key, &updated).unwrap();

    let loaded = store.get_project(key).unwrap().unwrap();
    assert_eq!(loaded.key, key);
    assert_eq!(loaded.fields, updated);

    // Keeping its own code is not a collision.
    store.update_project(key, &updated).unwrap();
}

#[test]
fn update_onto_another_rows_code_is_rejected() {
    let store = store();
    store
        .create_project(ProjectKey::new(1, 1), &project("P-100", 1))
        .unwrap();
    store
        .create_project(ProjectKey::new(2, 1), &project("P-200", 1))
        .unwrap();

    let err = store
        .update_project(ProjectKey::new(2, 1), &project("P-100", 2))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateProjectCode(_)));
    assert_eq!(
        store
            .get_project(ProjectKey::new(2, 1))
            .unwrap()
            .unwrap()
            .fields
            .project_code,
        "P-200"
    );
}

#[test]
fn update_of_missing_key_is_a_no_op_even_with_taken_code() {
    let store = store();
    store
        .create_project(ProjectKey::new(1, 1), &project("P-100", 1))
        .unwrap();

    store
        .update_project(ProjectKey::new(9, 9), &project("P-100", 5))
        .unwrap();

    let projects = store.list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].key, ProjectKey::new(1, 1));
    assert_eq!(projects[0].fields, project("P-100", 1));
}

#[test]
fn projects_list_in_key_order_and_delete_by_pair() {
    let store = store();
    store
        .create_project(ProjectKey::new(2, 1), &project("P-201", 1))
        .unwrap();
    store
        .create_project(ProjectKey::new(1, 2), &project("P-102", 1))
        .unwrap();
    store
        .create_project(ProjectKey::new(1, 1), &project("P-101", 1))
        .unwrap();

    let keys: Vec<ProjectKey> = store
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|record| record.key)
        .collect();
    assert_eq!(
        keys,
        [ProjectKey::new(1, 1), ProjectKey::new(1, 2), ProjectKey::new(2, 1)]
    );
    assert!(store.list_projects().unwrap()[0].employee_name.is_none());

    store.delete_project(ProjectKey::new(1, 2)).unwrap();
    assert!(store.get_project(ProjectKey::new(1, 2)).unwrap().is_none());
    store.delete_project(ProjectKey::new(1, 2)).unwrap();
    assert_eq!(store.list_projects().unwrap().len(), 2);
}

#[test]
fn serialized_project_flattens_key_and_code() {
    let store = store();
    let key = ProjectKey::new(1, 1);
    store.create_project(key, &project("P-100", 3)).unwrap();

    let json = serde_json::to_value(store.get_project(key).unwrap().unwrap()).unwrap();
    assert_eq!(json["EmployeeID"], 1);
    assert_eq!(json["TeamID"], 1);
    assert_eq!(json["ProjectID"], "P-100");
    assert_eq!(json["Sprint"], 3);
}
