//! Attendance repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `EmployeeID` is not checked on write.
//! - Reads LEFT JOIN `Employee_details` for `EmployeeName`; rows whose
//!   employee is missing are still returned.

use crate::db::schema::Table;
use crate::model::attendance::{AttendanceFields, AttendanceRecord};
use crate::model::AttendanceId;
use crate::repo::{ensure_connection_ready, in_row, read_date, read_key, read_text, RepoResult};
use rusqlite::{params, Connection, Row};

const ATTENDANCE_SELECT_SQL: &str = "SELECT
    a.AttendanceID AS AttendanceID,
    a.EmployeeID AS EmployeeID,
    a.Date AS Date,
    a.Status AS Status,
    e.EmployeeName AS EmployeeName
FROM Attendance a
LEFT JOIN Employee_details e ON a.EmployeeID = e.EmployeeID";

/// Repository interface for attendance CRUD operations.
pub trait AttendanceRepository {
    fn list_attendance(&self) -> RepoResult<Vec<AttendanceRecord>>;
    fn get_attendance(&self, id: AttendanceId) -> RepoResult<Option<AttendanceRecord>>;
    fn create_attendance(&self, fields: &AttendanceFields) -> RepoResult<AttendanceId>;
    fn update_attendance(&self, id: AttendanceId, fields: &AttendanceFields) -> RepoResult<()>;
    fn delete_attendance(&self, id: AttendanceId) -> RepoResult<()>;
}

/// SQLite-backed attendance repository.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[Table::Attendance, Table::Employee])?;
        Ok(Self::new(conn))
    }
}

impl AttendanceRepository for SqliteAttendanceRepository<'_> {
    fn list_attendance(&self) -> RepoResult<Vec<AttendanceRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ATTENDANCE_SELECT_SQL} ORDER BY a.AttendanceID ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_attendance_row(row)?);
        }
        Ok(records)
    }

    fn get_attendance(&self, id: AttendanceId) -> RepoResult<Option<AttendanceRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ATTENDANCE_SELECT_SQL} WHERE a.AttendanceID = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_attendance_row(row)?));
        }
        Ok(None)
    }

    fn create_attendance(&self, fields: &AttendanceFields) -> RepoResult<AttendanceId> {
        self.conn.execute(
            "INSERT INTO Attendance (EmployeeID, Date, Status) VALUES (?1, ?2, ?3);",
            params![fields.employee_id, fields.date, fields.status.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_attendance(&self, id: AttendanceId, fields: &AttendanceFields) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE Attendance
             SET
                EmployeeID = ?1,
                Date = ?2,
                Status = ?3
             WHERE AttendanceID = ?4;",
            params![fields.employee_id, fields.date, fields.status.as_str(), id],
        )?;
        Ok(())
    }

    fn delete_attendance(&self, id: AttendanceId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM Attendance WHERE AttendanceID = ?1;", [id])?;
        Ok(())
    }
}

fn parse_attendance_row(row: &Row<'_>) -> RepoResult<AttendanceRecord> {
    let id: AttendanceId = row.get("AttendanceID")?;
    let fields = in_row(parse_attendance_fields(row), Table::Attendance, id)?;
    Ok(AttendanceRecord {
        id,
        fields,
        employee_name: row.get("EmployeeName")?,
    })
}

fn parse_attendance_fields(row: &Row<'_>) -> RepoResult<AttendanceFields> {
    Ok(AttendanceFields {
        employee_id: read_key(row, Table::Attendance, "EmployeeID")?,
        date: read_date(row, Table::Attendance, "Date")?,
        status: read_text(row, "Status")?,
    })
}
