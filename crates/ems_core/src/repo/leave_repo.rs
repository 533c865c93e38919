//! Leave repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `EmployeeID` is not checked on write.
//! - Reads LEFT JOIN `Employee_details` for `EmployeeName`.

use crate::db::schema::Table;
use crate::model::leave::{LeaveFields, LeaveRecord};
use crate::model::LeaveId;
use crate::repo::{ensure_connection_ready, in_row, read_date, read_key, read_text, RepoResult};
use rusqlite::{params, Connection, Row};

const LEAVE_SELECT_SQL: &str = "SELECT
    l.LeaveID AS LeaveID,
    l.EmployeeID AS EmployeeID,
    l.StartDate AS StartDate,
    l.EndDate AS EndDate,
    l.Reason AS Reason,
    l.Status AS Status,
    e.EmployeeName AS EmployeeName
FROM Leave l
LEFT JOIN Employee_details e ON l.EmployeeID = e.EmployeeID";

/// Repository interface for leave CRUD operations.
pub trait LeaveRepository {
    fn list_leaves(&self) -> RepoResult<Vec<LeaveRecord>>;
    fn get_leave(&self, id: LeaveId) -> RepoResult<Option<LeaveRecord>>;
    fn create_leave(&self, fields: &LeaveFields) -> RepoResult<LeaveId>;
    fn update_leave(&self, id: LeaveId, fields: &LeaveFields) -> RepoResult<()>;
    fn delete_leave(&self, id: LeaveId) -> RepoResult<()>;
}

/// SQLite-backed leave repository.
pub struct SqliteLeaveRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLeaveRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[Table::Leave, Table::Employee])?;
        Ok(Self::new(conn))
    }
}

impl LeaveRepository for SqliteLeaveRepository<'_> {
    fn list_leaves(&self) -> RepoResult<Vec<LeaveRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LEAVE_SELECT_SQL} ORDER BY l.LeaveID ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_leave_row(row)?);
        }
        Ok(records)
    }

    fn get_leave(&self, id: LeaveId) -> RepoResult<Option<LeaveRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LEAVE_SELECT_SQL} WHERE l.LeaveID = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_leave_row(row)?));
        }
        Ok(None)
    }

    fn create_leave(&self, fields: &LeaveFields) -> RepoResult<LeaveId> {
        self.conn.execute(
            "INSERT INTO Leave (EmployeeID, StartDate, EndDate, Reason, Status)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                fields.employee_id,
                fields.start_date,
                fields.end_date,
                fields.reason.as_str(),
                fields.status.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_leave(&self, id: LeaveId, fields: &LeaveFields) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE Leave
             SET
                EmployeeID = ?1,
                StartDate = ?2,
                EndDate = ?3,
                Reason = ?4,
                Status = ?5
             WHERE LeaveID = ?6;",
            params![
                fields.employee_id,
                fields.start_date,
                fields.end_date,
                fields.reason.as_str(),
                fields.status.as_str(),
                id,
            ],
        )?;
        Ok(())
    }

    fn delete_leave(&self, id: LeaveId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM Leave WHERE LeaveID = ?1;", [id])?;
        Ok(())
    }
}

fn parse_leave_row(row: &Row<'_>) -> RepoResult<LeaveRecord> {
    let id: LeaveId = row.get("LeaveID")?;
    let fields = in_row(parse_leave_fields(row), Table::Leave, id)?;
    Ok(LeaveRecord {
        id,
        fields,
        employee_name: row.get("EmployeeName")?,
    })
}

fn parse_leave_fields(row: &Row<'_>) -> RepoResult<LeaveFields> {
    Ok(LeaveFields {
        employee_id: read_key(row, Table::Leave, "EmployeeID")?,
        start_date: read_date(row, Table::Leave, "StartDate")?,
        end_date: read_date(row, Table::Leave, "EndDate")?,
        reason: read_text(row, "Reason")?,
        status: read_text(row, "Status")?,
    })
}
