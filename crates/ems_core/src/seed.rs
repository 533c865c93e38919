//! Demo data for fresh databases.
//!
//! Rows are built through the same form boundary the request layer uses, so
//! the fixture exercises parsing as well as persistence.

use crate::form::{FormData, FromForm};
use crate::model::department::DepartmentFields;
use crate::model::employee::EmployeeFields;
use crate::model::position::PositionFields;
use crate::model::{DepartmentId, EmployeeId, PositionId};
use crate::repo::RepoResult;
use crate::store::RecordStore;
use log::info;

const DEPARTMENTS: [(&str, &str); 3] = [("IT", "Floor 1"), ("HR", "Floor 2"), ("Finance", "Floor 3")];

/// `(position name, index into DEPARTMENTS)`.
const POSITIONS: [(&str, usize); 4] = [
    ("Developer", 0),
    ("Manager", 0),
    ("HR Specialist", 1),
    ("Accountant", 2),
];

/// Ids assigned to the seeded rows, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub department_ids: Vec<DepartmentId>,
    pub position_ids: Vec<PositionId>,
    pub employee_ids: Vec<EmployeeId>,
}

/// Inserts three departments, four positions and two employees.
///
/// Not idempotent: running it twice inserts a second copy of every row.
pub fn seed_demo_data(store: &RecordStore) -> RepoResult<SeedSummary> {
    let mut department_ids = Vec::with_capacity(DEPARTMENTS.len());
    for (name, location) in DEPARTMENTS {
        department_ids.push(store.create_department(&DepartmentFields::new(name, location))?);
    }

    let mut position_ids = Vec::with_capacity(POSITIONS.len());
    for (name, department) in POSITIONS {
        let fields = PositionFields::new(name, Some(department_ids[department]));
        position_ids.push(store.create_position(&fields)?);
    }

    let it = department_ids[0].to_string();
    let employees = [
        FormData::new()
            .with("EmployeeName", "John Doe")
            .with("HireDate", "2020-01-15")
            .with("Experience", "5 years")
            .with("PositionID", position_ids[0].to_string())
            .with("Gender", "Male")
            .with("DepartmentID", it.as_str())
            .with("Email", "john@example.com")
            .with("Phone", "1234567890")
            .with("Status", "Active")
            .with("DOB", "1990-05-10")
            .with("Salary", "50000")
            .with("TeamID", "1"),
        FormData::new()
            .with("EmployeeName", "Jane Smith")
            .with("HireDate", "2019-03-20")
            .with("Experience", "6 years")
            .with("PositionID", position_ids[1].to_string())
            .with("Gender", "Female")
            .with("DepartmentID", it.as_str())
            .with("Email", "jane@example.com")
            .with("Phone", "9876543210")
            .with("Status", "Active")
            .with("DOB", "1988-11-25")
            .with("Salary", "70000")
            .with("TeamID", "1"),
    ];

    let mut employee_ids = Vec::with_capacity(employees.len());
    for form in &employees {
        employee_ids.push(store.create_employee(&EmployeeFields::from_form(form)?)?);
    }

    info!(
        "event=seed module=seed status=ok departments={} positions={} employees={}",
        department_ids.len(),
        position_ids.len(),
        employee_ids.len()
    );

    Ok(SeedSummary {
        department_ids,
        position_ids,
        employee_ids,
    })
}
