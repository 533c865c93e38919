//! Department repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Departments are referenced by `Position.DepartmentID` and
//!   `Employee_details.DepartmentID`; delete honors the configured
//!   [`DeletePolicy`].

use crate::config::DeletePolicy;
use crate::db::schema::Table;
use crate::model::department::{DepartmentFields, DepartmentRecord};
use crate::model::DepartmentId;
use crate::repo::{ensure_connection_ready, ensure_not_referenced, read_text, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    DepartmentID,
    DeptName,
    Location
FROM Department";

const DEPARTMENT_REFERRERS: &[(Table, &str)] = &[
    (Table::Position, "DepartmentID"),
    (Table::Employee, "DepartmentID"),
];

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    fn list_departments(&self) -> RepoResult<Vec<DepartmentRecord>>;
    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<DepartmentRecord>>;
    fn create_department(&self, fields: &DepartmentFields) -> RepoResult<DepartmentId>;
    fn update_department(&self, id: DepartmentId, fields: &DepartmentFields) -> RepoResult<()>;
    fn delete_department(&self, id: DepartmentId) -> RepoResult<()>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
    delete_policy: DeletePolicy,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Wraps a connection returned by `open_db*` without re-checking the schema.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            delete_policy: DeletePolicy::default(),
        }
    }

    /// Constructs a repository after verifying the connection is migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[Table::Department])?;
        Ok(Self::new(conn))
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn list_departments(&self) -> RepoResult<Vec<DepartmentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY DepartmentID ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }
        Ok(departments)
    }

    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<DepartmentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE DepartmentID = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn create_department(&self, fields: &DepartmentFields) -> RepoResult<DepartmentId> {
        self.conn.execute(
            "INSERT INTO Department (DeptName, Location) VALUES (?1, ?2);",
            params![fields.name.as_str(), fields.location.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_department(&self, id: DepartmentId, fields: &DepartmentFields) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE Department
             SET
                DeptName = ?1,
                Location = ?2
             WHERE DepartmentID = ?3;",
            params![fields.name.as_str(), fields.location.as_str(), id],
        )?;
        Ok(())
    }

    fn delete_department(&self, id: DepartmentId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if self.delete_policy == DeletePolicy::Restrict {
            ensure_not_referenced(
                &tx,
                Table::Department,
                "DepartmentID",
                id,
                DEPARTMENT_REFERRERS,
            )?;
        }

        tx.execute("DELETE FROM Department WHERE DepartmentID = ?1;", [id])?;
        tx.commit()?;
        Ok(())
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<DepartmentRecord> {
    Ok(DepartmentRecord {
        id: row.get("DepartmentID")?,
        fields: DepartmentFields {
            name: read_text(row, "DeptName")?,
            location: read_text(row, "Location")?,
        },
    })
}
