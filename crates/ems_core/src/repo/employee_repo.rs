//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `Employee_details` with department/position enrichment.
//! - Keep the legacy `Position` text column mirrored from `PositionID`.
//!
//! # Invariants
//! - Reads LEFT JOIN `Department` and `Position`; a missing or dangling
//!   reference yields `None` enrichment and never drops the row.
//! - `DepartmentID` and `PositionID` must name existing rows when set.
//! - Employees are referenced by `Attendance`, `Leave`, `Project` and
//!   `Payroll`; delete honors the configured [`DeletePolicy`].

use crate::config::DeletePolicy;
use crate::db::schema::Table;
use crate::model::employee::{EmployeeFields, EmployeeRecord};
use crate::model::EmployeeId;
use crate::repo::{
    ensure_connection_ready, ensure_not_referenced, ensure_reference_exists, in_row, read_date,
    read_optional_ref, read_text, RepoResult,
};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    e.EmployeeID AS EmployeeID,
    e.EmployeeName AS EmployeeName,
    e.HireDate AS HireDate,
    e.Experience AS Experience,
    e.PositionID AS PositionID,
    e.Gender AS Gender,
    e.DepartmentID AS DepartmentID,
    e.Email AS Email,
    e.Phone AS Phone,
    e.Status AS Status,
    e.DOB AS DOB,
    e.Salary AS Salary,
    e.TeamID AS TeamID,
    d.DeptName AS DeptName,
    p.PositionName AS PositionName
FROM Employee_details e
LEFT JOIN Department d ON e.DepartmentID = d.DepartmentID
LEFT JOIN Position p ON e.PositionID = p.PositionID";

const EMPLOYEE_REFERRERS: &[(Table, &str)] = &[
    (Table::Attendance, "EmployeeID"),
    (Table::Leave, "EmployeeID"),
    (Table::Project, "EmployeeID"),
    (Table::Payroll, "EmployeeID"),
];

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    fn list_employees(&self) -> RepoResult<Vec<EmployeeRecord>>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<EmployeeRecord>>;
    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<EmployeeId>;
    fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<()>;
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
    delete_policy: DeletePolicy,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &Table::ALL)?;
        Ok(Self::new(conn))
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn list_employees(&self) -> RepoResult<Vec<EmployeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY e.EmployeeID ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<EmployeeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE e.EmployeeID = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<EmployeeId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_employee_references(&tx, fields)?;

        tx.execute(
            "INSERT INTO Employee_details (
                EmployeeName,
                HireDate,
                Experience,
                Position,
                PositionID,
                Gender,
                DepartmentID,
                Email,
                Phone,
                Status,
                DOB,
                Salary,
                TeamID
            ) VALUES (
                ?1, ?2, ?3,
                (SELECT PositionName FROM Position WHERE PositionID = ?4),
                ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12
            );",
            params![
                fields.name.as_str(),
                fields.hire_date,
                fields.experience.as_str(),
                fields.position_id,
                fields.gender.as_str(),
                fields.department_id,
                fields.email.as_str(),
                fields.phone.as_str(),
                fields.status.as_str(),
                fields.date_of_birth.as_str(),
                fields.salary.as_str(),
                fields.team_id,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_employee_references(&tx, fields)?;

        tx.execute(
            "UPDATE Employee_details
             SET
                EmployeeName = ?1,
                HireDate = ?2,
                Experience = ?3,
                Position = (SELECT PositionName FROM Position WHERE PositionID = ?4),
                PositionID = ?4,
                Gender = ?5,
                DepartmentID = ?6,
                Email = ?7,
                Phone = ?8,
                Status = ?9,
                DOB = ?10,
                Salary = ?11,
                TeamID = ?12
             WHERE EmployeeID = ?13;",
            params![
                fields.name.as_str(),
                fields.hire_date,
                fields.experience.as_str(),
                fields.position_id,
                fields.gender.as_str(),
                fields.department_id,
                fields.email.as_str(),
                fields.phone.as_str(),
                fields.status.as_str(),
                fields.date_of_birth.as_str(),
                fields.salary.as_str(),
                fields.team_id,
                id,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if self.delete_policy == DeletePolicy::Restrict {
            ensure_not_referenced(&tx, Table::Employee, "EmployeeID", id, EMPLOYEE_REFERRERS)?;
        }

        tx.execute("DELETE FROM Employee_details WHERE EmployeeID = ?1;", [id])?;
        tx.commit()?;
        Ok(())
    }
}

fn ensure_employee_references(conn: &Connection, fields: &EmployeeFields) -> RepoResult<()> {
    ensure_reference_exists(conn, Table::Department, "DepartmentID", fields.department_id)?;
    ensure_reference_exists(conn, Table::Position, "PositionID", fields.position_id)
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<EmployeeRecord> {
    let id: EmployeeId = row.get("EmployeeID")?;
    let fields = in_row(parse_employee_fields(row), Table::Employee, id)?;
    Ok(EmployeeRecord {
        id,
        fields,
        dept_name: row.get("DeptName")?,
        position_name: row.get("PositionName")?,
    })
}

fn parse_employee_fields(row: &Row<'_>) -> RepoResult<EmployeeFields> {
    Ok(EmployeeFields {
        name: read_text(row, "EmployeeName")?,
        hire_date: read_date(row, Table::Employee, "HireDate")?,
        experience: read_text(row, "Experience")?,
        position_id: read_optional_ref(row, Table::Employee, "PositionID")?,
        gender: read_text(row, "Gender")?,
        department_id: read_optional_ref(row, Table::Employee, "DepartmentID")?,
        email: read_text(row, "Email")?,
        phone: read_text(row, "Phone")?,
        status: read_text(row, "Status")?,
        date_of_birth: read_text(row, "DOB")?,
        salary: read_text(row, "Salary")?,
        team_id: read_optional_ref(row, Table::Employee, "TeamID")?,
    })
}
