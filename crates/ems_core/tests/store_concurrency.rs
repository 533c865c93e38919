use ems_core::{DepartmentFields, RecordStore, StoreConfig};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_creates_from_many_threads_all_persist() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(RecordStore::open(StoreConfig::file(dir.path().join("ems.db"))).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..25)
                    .map(|n| {
                        store
                            .create_department(&DepartmentFields::new(
                                format!("Dept {worker}-{n}"),
                                format!("Floor {worker}"),
                            ))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "id {id} assigned twice");
        }
    }

    assert_eq!(ids.len(), 200);
    assert_eq!(store.list_departments().unwrap().len(), 200);
}

#[test]
fn reads_interleave_with_writes() {
    let store = Arc::new(RecordStore::open(StoreConfig::in_memory()).unwrap());

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for n in 0..50 {
                store
                    .create_department(&DepartmentFields::new(format!("D{n}"), "Floor 1"))
                    .unwrap();
            }
        })
    };
    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let mut last = 0;
            for _ in 0..50 {
                let seen = store.list_departments().unwrap().len();
                assert!(seen >= last);
                last = seen;
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(store.list_departments().unwrap().len(), 50);
}
