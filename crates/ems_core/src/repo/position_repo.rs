//! Position repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `DepartmentID` must name an existing department when set.
//! - Renaming a position rewrites the legacy `Employee_details.Position`
//!   mirror of every employee referencing it, in the same transaction.
//! - Positions are referenced by `Employee_details.PositionID`.

use crate::config::DeletePolicy;
use crate::db::schema::Table;
use crate::model::position::{PositionFields, PositionRecord};
use crate::model::PositionId;
use crate::repo::{
    ensure_connection_ready, ensure_not_referenced, ensure_reference_exists, in_row,
    read_optional_ref, read_text, RepoResult,
};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const POSITION_SELECT_SQL: &str = "SELECT
    PositionID,
    PositionName,
    DepartmentID
FROM Position";

const POSITION_REFERRERS: &[(Table, &str)] = &[(Table::Employee, "PositionID")];

/// Repository interface for position CRUD operations.
pub trait PositionRepository {
    fn list_positions(&self) -> RepoResult<Vec<PositionRecord>>;
    fn get_position(&self, id: PositionId) -> RepoResult<Option<PositionRecord>>;
    fn create_position(&self, fields: &PositionFields) -> RepoResult<PositionId>;
    fn update_position(&self, id: PositionId, fields: &PositionFields) -> RepoResult<()>;
    fn delete_position(&self, id: PositionId) -> RepoResult<()>;
}

/// SQLite-backed position repository.
pub struct SqlitePositionRepository<'conn> {
    conn: &'conn Connection,
    delete_policy: DeletePolicy,
}

impl<'conn> SqlitePositionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[Table::Position, Table::Department, Table::Employee])?;
        Ok(Self::new(conn))
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }
}

impl PositionRepository for SqlitePositionRepository<'_> {
    fn list_positions(&self) -> RepoResult<Vec<PositionRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POSITION_SELECT_SQL} ORDER BY PositionID ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut positions = Vec::new();
        while let Some(row) = rows.next()? {
            positions.push(parse_position_row(row)?);
        }
        Ok(positions)
    }

    fn get_position(&self, id: PositionId) -> RepoResult<Option<PositionRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POSITION_SELECT_SQL} WHERE PositionID = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_position_row(row)?));
        }
        Ok(None)
    }

    fn create_position(&self, fields: &PositionFields) -> RepoResult<PositionId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_reference_exists(&tx, Table::Department, "DepartmentID", fields.department_id)?;

        tx.execute(
            "INSERT INTO Position (PositionName, DepartmentID) VALUES (?1, ?2);",
            params![fields.name.as_str(), fields.department_id],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn update_position(&self, id: PositionId, fields: &PositionFields) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_reference_exists(&tx, Table::Department, "DepartmentID", fields.department_id)?;

        let changed = tx.execute(
            "UPDATE Position
             SET
                PositionName = ?1,
                DepartmentID = ?2
             WHERE PositionID = ?3;",
            params![fields.name.as_str(), fields.department_id, id],
        )?;
        if changed > 0 {
            tx.execute(
                "UPDATE Employee_details SET Position = ?1 WHERE PositionID = ?2;",
                params![fields.name.as_str(), id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_position(&self, id: PositionId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if self.delete_policy == DeletePolicy::Restrict {
            ensure_not_referenced(&tx, Table::Position, "PositionID", id, POSITION_REFERRERS)?;
        }

        tx.execute("DELETE FROM Position WHERE PositionID = ?1;", [id])?;
        tx.commit()?;
        Ok(())
    }
}

fn parse_position_row(row: &Row<'_>) -> RepoResult<PositionRecord> {
    let id: PositionId = row.get("PositionID")?;
    let department_id = in_row(
        read_optional_ref(row, Table::Position, "DepartmentID"),
        Table::Position,
        id,
    )?;
    Ok(PositionRecord {
        id,
        fields: PositionFields {
            name: read_text(row, "PositionName")?,
            department_id,
        },
    })
}
