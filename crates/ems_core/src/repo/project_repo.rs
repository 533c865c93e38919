//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `Project`, keyed by the caller-supplied `(EmployeeID, TeamID)`.
//! - Report key and `ProjectID` collisions as typed errors.
//!
//! # Invariants
//! - The key pair is never rewritten by update.
//! - Updating a missing key is a no-op, even when its `ProjectID` is taken.
//! - `ProjectID` stays unique across rows; the check and the write share one
//!   IMMEDIATE transaction, and a constraint failure that slips past it is
//!   still mapped to the same typed error.

use crate::db::schema::Table;
use crate::model::project::{ProjectFields, ProjectKey, ProjectRecord};
use crate::repo::{
    ensure_connection_ready, in_row, read_key, read_optional_ref, read_text, RepoError, RepoResult,
};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const PROJECT_SELECT_SQL: &str = "SELECT
    p.EmployeeID AS EmployeeID,
    p.TeamID AS TeamID,
    p.ProjectID AS ProjectID,
    p.Task AS Task,
    p.Status AS Status,
    p.Sprint AS Sprint,
    e.EmployeeName AS EmployeeName
FROM Project p
LEFT JOIN Employee_details e ON p.EmployeeID = e.EmployeeID";

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    fn list_projects(&self) -> RepoResult<Vec<ProjectRecord>>;
    fn get_project(&self, key: ProjectKey) -> RepoResult<Option<ProjectRecord>>;
    fn create_project(&self, key: ProjectKey, fields: &ProjectFields) -> RepoResult<()>;
    fn update_project(&self, key: ProjectKey, fields: &ProjectFields) -> RepoResult<()>;
    fn delete_project(&self, key: ProjectKey) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[Table::Project, Table::Employee])?;
        Ok(Self::new(conn))
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn list_projects(&self) -> RepoResult<Vec<ProjectRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} ORDER BY p.EmployeeID ASC, p.TeamID ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn get_project(&self, key: ProjectKey) -> RepoResult<Option<ProjectRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} WHERE p.EmployeeID = ?1 AND p.TeamID = ?2;"
        ))?;
        let mut rows = stmt.query([key.employee_id, key.team_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn create_project(&self, key: ProjectKey, fields: &ProjectFields) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if project_exists(&tx, key)? {
            return Err(RepoError::DuplicateProjectKey(key));
        }
        ensure_code_available(&tx, key, &fields.project_code)?;

        tx.execute(
            "INSERT INTO Project (EmployeeID, TeamID, ProjectID, Task, Status, Sprint)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                key.employee_id,
                key.team_id,
                fields.project_code.as_str(),
                fields.task.as_str(),
                fields.status.as_str(),
                fields.sprint,
            ],
        )
        .map_err(|err| map_constraint_error(err, key, &fields.project_code))?;
        tx.commit()?;
        Ok(())
    }

    fn update_project(&self, key: ProjectKey, fields: &ProjectFields) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !project_exists(&tx, key)? {
            return Ok(());
        }
        ensure_code_available(&tx, key, &fields.project_code)?;

        tx.execute(
            "UPDATE Project
             SET
                ProjectID = ?1,
                Task = ?2,
                Status = ?3,
                Sprint = ?4
             WHERE EmployeeID = ?5 AND TeamID = ?6;",
            params![
                fields.project_code.as_str(),
                fields.task.as_str(),
                fields.status.as_str(),
                fields.sprint,
                key.employee_id,
                key.team_id,
            ],
        )
        .map_err(|err| map_constraint_error(err, key, &fields.project_code))?;
        tx.commit()?;
        Ok(())
    }

    fn delete_project(&self, key: ProjectKey) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM Project WHERE EmployeeID = ?1 AND TeamID = ?2;",
            [key.employee_id, key.team_id],
        )?;
        Ok(())
    }
}

fn project_exists(conn: &Connection, key: ProjectKey) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM Project WHERE EmployeeID = ?1 AND TeamID = ?2);",
        [key.employee_id, key.team_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Fails when a row other than `key` already carries `code`.
fn ensure_code_available(conn: &Connection, key: ProjectKey, code: &str) -> RepoResult<()> {
    let owner: Option<(i64, i64)> = conn
        .query_row(
            "SELECT EmployeeID, TeamID FROM Project WHERE ProjectID = ?1 LIMIT 1;",
            [code],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match owner {
        Some((employee_id, team_id)) if ProjectKey::new(employee_id, team_id) != key => {
            Err(RepoError::DuplicateProjectCode(code.to_string()))
        }
        _ => Ok(()),
    }
}

fn map_constraint_error(err: rusqlite::Error, key: ProjectKey, code: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => return RepoError::DuplicateProjectKey(key),
            ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return RepoError::DuplicateProjectCode(code.to_string())
            }
            _ => {}
        }
    }
    RepoError::from(err)
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<ProjectRecord> {
    let key = ProjectKey::new(
        read_key(row, Table::Project, "EmployeeID")?,
        read_key(row, Table::Project, "TeamID")?,
    );
    let sprint = in_row(
        read_optional_ref(row, Table::Project, "Sprint"),
        Table::Project,
        key,
    )?;
    Ok(ProjectRecord {
        key,
        fields: ProjectFields {
            project_code: read_text(row, "ProjectID")?,
            task: read_text(row, "Task")?,
            status: read_text(row, "Status")?,
            sprint: sprint.unwrap_or_default(),
        },
        employee_name: row.get("EmployeeName")?,
    })
}
