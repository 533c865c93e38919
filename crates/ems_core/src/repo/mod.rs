//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity CRUD contracts over the legacy tables.
//! - Keep SQL details inside the persistence boundary.
//! - Translate SQLite failures into semantic errors (uniqueness, references).
//!
//! # Invariants
//! - `get_*` reports an absent row as `Ok(None)`, never as an error.
//! - Update and delete of a missing key are silent no-ops.
//! - Every write is one statement or one IMMEDIATE transaction.
//! - Read paths reject persisted values that cannot be typed instead of
//!   masking them.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::schema::Table;
use crate::db::DbError;
use crate::form::InputError;
use crate::model::project::ProjectKey;
use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode, Row};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod attendance_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod leave_repo;
pub mod payroll_repo;
pub mod position_repo;
pub mod project_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from record repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller input failed boundary parsing.
    Input(InputError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// A project row already exists for this `(employee, team)` pair.
    DuplicateProjectKey(ProjectKey),
    /// Another project row already uses this `ProjectID`.
    DuplicateProjectCode(String),
    /// Delete rejected because rows in `referenced_by` still point at the key.
    Referenced {
        table: Table,
        key: i64,
        referenced_by: Table,
    },
    /// Write points at a parent row that does not exist.
    MissingReference { table: Table, key: i64 },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

/// Coarse error classification for callers deciding how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; fix the request.
    Input,
    /// Uniqueness or reference rule; the request conflicts with stored rows.
    Conflict,
    /// Busy, locked, out of space or I/O; the same call may succeed later.
    Transient,
    /// Schema, corruption or other storage faults.
    Storage,
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) => ErrorKind::Input,
            Self::DuplicateProjectKey(_)
            | Self::DuplicateProjectCode(_)
            | Self::Referenced { .. }
            | Self::MissingReference { .. } => ErrorKind::Conflict,
            Self::Db(DbError::Sqlite(err) | DbError::Migration { source: err, .. })
                if is_transient(err) =>
            {
                ErrorKind::Transient
            }
            Self::Db(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => ErrorKind::Storage,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateProjectKey(key) => write!(f, "project already exists for {key}"),
            Self::DuplicateProjectCode(code) => write!(f, "project id `{code}` is already in use"),
            Self::Referenced {
                table,
                key,
                referenced_by,
            } => write!(
                f,
                "{table} {key} is still referenced by rows in {referenced_by}"
            ),
            Self::MissingReference { table, key } => {
                write!(f, "referenced {table} {key} does not exist")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "record repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "record repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "record repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateProjectKey(_)
            | Self::DuplicateProjectCode(_)
            | Self::Referenced { .. }
            | Self::MissingReference { .. }
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<InputError> for RepoError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn is_transient(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(
            ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::DiskFull
                | ErrorCode::SystemIoFailure
                | ErrorCode::OutOfMemory
        )
    )
}

/// Verifies that `conn` is migrated and carries the columns of `tables`.
pub(crate) fn ensure_connection_ready(conn: &Connection, tables: &[Table]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        let name = table.name();
        if !table_exists(conn, name)? {
            return Err(RepoError::MissingRequiredTable(name));
        }
        for column in table.columns() {
            if !table_has_column(conn, name, column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: name,
                    column,
                });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Fails with `MissingReference` when `key` is set and `table` has no such row.
pub(crate) fn ensure_reference_exists(
    conn: &Connection,
    table: Table,
    key_column: &'static str,
    key: Option<i64>,
) -> RepoResult<()> {
    let Some(key) = key else {
        return Ok(());
    };

    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {key_column} = ?1);",
            table.name()
        ),
        [key],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::MissingReference { table, key })
    }
}

/// Returns the first table in `referrers` holding a row whose `column` equals `key`.
fn find_referrer(
    conn: &Connection,
    referrers: &[(Table, &'static str)],
    key: i64,
) -> RepoResult<Option<Table>> {
    for (table, column) in referrers {
        let exists: i64 = conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {column} = ?1);",
                table.name()
            ),
            [key],
            |row| row.get(0),
        )?;
        if exists == 1 {
            return Ok(Some(*table));
        }
    }
    Ok(None)
}

/// Fails with `Referenced` when the row `table.key_column = key` exists and
/// any of `referrers` still points at it. Missing rows pass.
pub(crate) fn ensure_not_referenced(
    conn: &Connection,
    table: Table,
    key_column: &'static str,
    key: i64,
    referrers: &[(Table, &'static str)],
) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {key_column} = ?1);",
            table.name()
        ),
        [key],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Ok(());
    }

    match find_referrer(conn, referrers, key)? {
        Some(referenced_by) => Err(RepoError::Referenced {
            table,
            key,
            referenced_by,
        }),
        None => Ok(()),
    }
}

/// Reads a legacy nullable TEXT column; NULL reads as the empty string.
pub(crate) fn read_text(row: &Row<'_>, column: &str) -> RepoResult<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

/// Reads a required integer reference. Legacy rows may hold it as numeric text.
pub(crate) fn read_key(row: &Row<'_>, table: Table, column: &str) -> RepoResult<i64> {
    read_optional_ref(row, table, column)?
        .ok_or_else(|| RepoError::InvalidData(format!("missing value in {table}.{column}")))
}

/// Reads a nullable integer reference.
///
/// Rows written by the legacy forms hold an unselected reference as `''`
/// and selected ones may survive as numeric text; both are accepted, with
/// blank text reading as `None`.
pub(crate) fn read_optional_ref(
    row: &Row<'_>,
    table: Table,
    column: &str,
) -> RepoResult<Option<i64>> {
    match row.get_ref(column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(value)),
        ValueRef::Real(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            Ok(Some(value as i64))
        }
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<i64>().map(Some).map_err(|_| {
                RepoError::InvalidData(format!("invalid integer `{text}` in {table}.{column}"))
            })
        }
        ValueRef::Real(_) | ValueRef::Blob(_) => Err(RepoError::InvalidData(format!(
            "invalid integer value in {table}.{column}"
        ))),
    }
}

pub(crate) fn read_date(row: &Row<'_>, table: Table, column: &str) -> RepoResult<NaiveDate> {
    let value: Option<String> = match row.get_ref(column)? {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Null => None,
        _ => {
            return Err(RepoError::InvalidData(format!(
                "non-text date in {table}.{column}"
            )))
        }
    };
    let Some(value) = value else {
        return Err(RepoError::InvalidData(format!("NULL in {table}.{column}")));
    };
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in {table}.{column}"))
    })
}

/// Reads a `DECIMAL(10,2)` column. NUMERIC affinity may have stored the
/// value as INTEGER, REAL or TEXT; all three are accepted. Values written
/// through the store fit in ten significant digits, so REAL storage
/// round-trips them exactly once rounded back to two places.
pub(crate) fn read_decimal(row: &Row<'_>, table: Table, column: &str) -> RepoResult<Decimal> {
    let value = match row.get_ref(column)? {
        ValueRef::Integer(value) => Some(Decimal::from(value)),
        ValueRef::Real(value) => Decimal::from_f64(value).map(|value| value.round_dp(2)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| Decimal::from_str(text.trim()).ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    };

    let mut value = value.ok_or_else(|| {
        RepoError::InvalidData(format!("invalid decimal value in {table}.{column}"))
    })?;
    if value.scale() < 2 {
        value.rescale(2);
    }
    Ok(value)
}

/// Prefixes a read failure with the key of the row it came from, so one
/// malformed legacy row can be located and repaired.
pub(crate) fn in_row<T>(result: RepoResult<T>, table: Table, key: impl Display) -> RepoResult<T> {
    result.map_err(|err| match err {
        RepoError::InvalidData(message) => {
            RepoError::InvalidData(format!("{table} row {key}: {message}"))
        }
        other => other,
    })
}
