//! CSV snapshot export.
//!
//! # Responsibility
//! - Dump every table to `<Table>.csv` under a caller-chosen directory.
//!
//! # Invariants
//! - The header row is the table's column list in schema order.
//! - Values are written as stored; NULL becomes an empty cell.
//! - The snapshot is taken under the store lock, so it never interleaves
//!   with a write.

use crate::db::schema::Table;
use crate::repo::RepoError;
use crate::store::RecordStore;
use csv::WriterBuilder;
use log::{error, info};
use rusqlite::types::ValueRef;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: std::io::Error },
    Csv { path: PathBuf, source: csv::Error },
    Store(RepoError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot write `{}`: {source}", path.display()),
            Self::Csv { path, source } => {
                write!(f, "csv error in `{}`: {source}", path.display())
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<RepoError> for ExportError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for ExportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(RepoError::from(value))
    }
}

/// Writes one CSV file per table into `dir`, creating it if needed.
///
/// Returns the written paths in table dependency order. Existing files
/// with the same names are overwritten.
pub fn export_csv(store: &RecordStore, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ExportError> {
    let dir = dir.as_ref();
    let started_at = Instant::now();
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let result = store.with_connection(|conn| -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let path = dir.join(format!("{}.csv", table.name()));
            write_table(conn, table, &path)?;
            written.push(path);
        }
        Ok(written)
    });

    match result {
        Ok(written) => {
            info!(
                "event=csv_export module=export status=ok files={} duration_ms={}",
                written.len(),
                started_at.elapsed().as_millis()
            );
            Ok(written)
        }
        Err(err) => {
            error!(
                "event=csv_export module=export status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn write_table(conn: &rusqlite::Connection, table: Table, path: &Path) -> Result<(), ExportError> {
    let csv_err = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let columns = table.columns();
    let mut writer = WriterBuilder::new().from_path(path).map_err(csv_err)?;
    writer.write_record(columns).map_err(csv_err)?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {} ORDER BY rowid ASC;",
        columns.join(", "),
        table.name()
    ))?;
    let mut rows = stmt.query([])?;
    let mut record = Vec::with_capacity(columns.len());
    while let Some(row) = rows.next()? {
        record.clear();
        for index in 0..columns.len() {
            record.push(render_value(row.get_ref(index)?));
        }
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::render_value;
    use rusqlite::types::ValueRef;

    #[test]
    fn null_renders_as_empty_cell() {
        assert_eq!(render_value(ValueRef::Null), "");
        assert_eq!(render_value(ValueRef::Integer(7)), "7");
        assert_eq!(render_value(ValueRef::Real(4500.75)), "4500.75");
        assert_eq!(render_value(ValueRef::Text(b"Floor 1")), "Floor 1");
    }
}
