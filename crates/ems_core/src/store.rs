//! Record store facade.
//!
//! # Responsibility
//! - Own the single SQLite connection and serialize access to it.
//! - Expose list/get/create/update/delete for every entity.
//! - Apply the configured delete policy and log write outcomes.
//!
//! # Invariants
//! - A store is an explicitly constructed value; there is no global handle.
//! - Every call takes the connection lock for its whole duration, so each
//!   write is observed atomically by other threads.
//! - Log events carry table names, keys and durations, never field values.

use crate::config::{StoreConfig, StoreLocation};
use crate::db::schema::Table;
use crate::db::{open_db_in_memory_with_timeout, open_db_with_timeout};
use crate::model::attendance::{AttendanceFields, AttendanceRecord};
use crate::model::department::{DepartmentFields, DepartmentRecord};
use crate::model::employee::{EmployeeFields, EmployeeRecord};
use crate::model::leave::{LeaveFields, LeaveRecord};
use crate::model::payroll::{PayrollFields, PayrollRecord};
use crate::model::position::{PositionFields, PositionRecord};
use crate::model::project::{ProjectFields, ProjectKey, ProjectRecord};
use crate::model::{AttendanceId, DepartmentId, EmployeeId, LeaveId, PayrollId, PositionId};
use crate::repo::attendance_repo::{AttendanceRepository, SqliteAttendanceRepository};
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::leave_repo::{LeaveRepository, SqliteLeaveRepository};
use crate::repo::payroll_repo::{PayrollRepository, SqlitePayrollRepository};
use crate::repo::position_repo::{PositionRepository, SqlitePositionRepository};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::{ErrorKind, RepoError, RepoResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::fmt::Display;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Owned handle over one employee-management database.
///
/// `RecordStore` is `Send + Sync`; share it across threads with `Arc`.
pub struct RecordStore {
    conn: Mutex<Connection>,
    config: StoreConfig,
}

impl RecordStore {
    /// Opens (creating if needed) and migrates the store described by `config`.
    pub fn open(config: StoreConfig) -> RepoResult<Self> {
        let conn = match &config.location {
            StoreLocation::File(path) => open_db_with_timeout(path, config.busy_timeout)?,
            StoreLocation::Memory => open_db_in_memory_with_timeout(config.busy_timeout)?,
        };
        info!(
            "event=store_open module=store status=ok delete_policy={:?}",
            config.delete_policy
        );
        Ok(Self {
            conn: Mutex::new(conn),
            config,
        })
    }

    /// Opens the file store at `path` with default options.
    ///
    /// Idempotent: an existing database keeps its tables and rows.
    pub fn initialize(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::open(StoreConfig::file(path))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Closes the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> RepoResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, err)| {
            error!("event=store_close module=store status=error error={err}");
            RepoError::from(err)
        })?;
        info!("event=store_close module=store status=ok");
        Ok(())
    }

    /// Runs `f` with the connection held for the duration of the call.
    pub(crate) fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E> {
        f(&*self.lock())
    }

    // Poison is ignored: writes are single statements or transactions that
    // roll back on drop.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write<T>(
        &self,
        table: Table,
        op: &'static str,
        key: &dyn Display,
        f: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let result = f(&*self.lock());
        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => info!(
                "event=record_write module=store status=ok table={table} op={op} key={key} duration_ms={duration_ms}"
            ),
            Err(err) if err.kind() == ErrorKind::Storage => error!(
                "event=record_write module=store status=error table={table} op={op} key={key} duration_ms={duration_ms} kind={:?} error={err}",
                err.kind()
            ),
            Err(err) => warn!(
                "event=record_write module=store status=rejected table={table} op={op} key={key} duration_ms={duration_ms} kind={:?}",
                err.kind()
            ),
        }
        result
    }

    // Departments

    pub fn list_departments(&self) -> RepoResult<Vec<DepartmentRecord>> {
        SqliteDepartmentRepository::new(&self.lock()).list_departments()
    }

    pub fn get_department(&self, id: DepartmentId) -> RepoResult<Option<DepartmentRecord>> {
        SqliteDepartmentRepository::new(&self.lock()).get_department(id)
    }

    pub fn create_department(&self, fields: &DepartmentFields) -> RepoResult<DepartmentId> {
        self.write(Table::Department, "create", &"new", |conn| {
            SqliteDepartmentRepository::new(conn).create_department(fields)
        })
    }

    pub fn update_department(&self, id: DepartmentId, fields: &DepartmentFields) -> RepoResult<()> {
        self.write(Table::Department, "update", &id, |conn| {
            SqliteDepartmentRepository::new(conn).update_department(id, fields)
        })
    }

    pub fn delete_department(&self, id: DepartmentId) -> RepoResult<()> {
        self.write(Table::Department, "delete", &id, |conn| {
            SqliteDepartmentRepository::new(conn)
                .with_delete_policy(self.config.delete_policy)
                .delete_department(id)
        })
    }

    // Positions

    pub fn list_positions(&self) -> RepoResult<Vec<PositionRecord>> {
        SqlitePositionRepository::new(&self.lock()).list_positions()
    }

    pub fn get_position(&self, id: PositionId) -> RepoResult<Option<PositionRecord>> {
        SqlitePositionRepository::new(&self.lock()).get_position(id)
    }

    pub fn create_position(&self, fields: &PositionFields) -> RepoResult<PositionId> {
        self.write(Table::Position, "create", &"new", |conn| {
            SqlitePositionRepository::new(conn).create_position(fields)
        })
    }

    pub fn update_position(&self, id: PositionId, fields: &PositionFields) -> RepoResult<()> {
        self.write(Table::Position, "update", &id, |conn| {
            SqlitePositionRepository::new(conn).update_position(id, fields)
        })
    }

    pub fn delete_position(&self, id: PositionId) -> RepoResult<()> {
        self.write(Table::Position, "delete", &id, |conn| {
            SqlitePositionRepository::new(conn)
                .with_delete_policy(self.config.delete_policy)
                .delete_position(id)
        })
    }

    // Employees

    pub fn list_employees(&self) -> RepoResult<Vec<EmployeeRecord>> {
        SqliteEmployeeRepository::new(&self.lock()).list_employees()
    }

    pub fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<EmployeeRecord>> {
        SqliteEmployeeRepository::new(&self.lock()).get_employee(id)
    }

    pub fn create_employee(&self, fields: &EmployeeFields) -> RepoResult<EmployeeId> {
        self.write(Table::Employee, "create", &"new", |conn| {
            SqliteEmployeeRepository::new(conn).create_employee(fields)
        })
    }

    pub fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<()> {
        self.write(Table::Employee, "update", &id, |conn| {
            SqliteEmployeeRepository::new(conn).update_employee(id, fields)
        })
    }

    pub fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        self.write(Table::Employee, "delete", &id, |conn| {
            SqliteEmployeeRepository::new(conn)
                .with_delete_policy(self.config.delete_policy)
                .delete_employee(id)
        })
    }

    // Attendance

    pub fn list_attendance(&self) -> RepoResult<Vec<AttendanceRecord>> {
        SqliteAttendanceRepository::new(&self.lock()).list_attendance()
    }

    pub fn get_attendance(&self, id: AttendanceId) -> RepoResult<Option<AttendanceRecord>> {
        SqliteAttendanceRepository::new(&self.lock()).get_attendance(id)
    }

    pub fn create_attendance(&self, fields: &AttendanceFields) -> RepoResult<AttendanceId> {
        self.write(Table::Attendance, "create", &"new", |conn| {
            SqliteAttendanceRepository::new(conn).create_attendance(fields)
        })
    }

    pub fn update_attendance(&self, id: AttendanceId, fields: &AttendanceFields) -> RepoResult<()> {
        self.write(Table::Attendance, "update", &id, |conn| {
            SqliteAttendanceRepository::new(conn).update_attendance(id, fields)
        })
    }

    pub fn delete_attendance(&self, id: AttendanceId) -> RepoResult<()> {
        self.write(Table::Attendance, "delete", &id, |conn| {
            SqliteAttendanceRepository::new(conn).delete_attendance(id)
        })
    }

    // Leave

    pub fn list_leaves(&self) -> RepoResult<Vec<LeaveRecord>> {
        SqliteLeaveRepository::new(&self.lock()).list_leaves()
    }

    pub fn get_leave(&self, id: LeaveId) -> RepoResult<Option<LeaveRecord>> {
        SqliteLeaveRepository::new(&self.lock()).get_leave(id)
    }

    pub fn create_leave(&self, fields: &LeaveFields) -> RepoResult<LeaveId> {
        self.write(Table::Leave, "create", &"new", |conn| {
            SqliteLeaveRepository::new(conn).create_leave(fields)
        })
    }

    pub fn update_leave(&self, id: LeaveId, fields: &LeaveFields) -> RepoResult<()> {
        self.write(Table::Leave, "update", &id, |conn| {
            SqliteLeaveRepository::new(conn).update_leave(id, fields)
        })
    }

    pub fn delete_leave(&self, id: LeaveId) -> RepoResult<()> {
        self.write(Table::Leave, "delete", &id, |conn| {
            SqliteLeaveRepository::new(conn).delete_leave(id)
        })
    }

    // Projects

    pub fn list_projects(&self) -> RepoResult<Vec<ProjectRecord>> {
        SqliteProjectRepository::new(&self.lock()).list_projects()
    }

    pub fn get_project(&self, key: ProjectKey) -> RepoResult<Option<ProjectRecord>> {
        SqliteProjectRepository::new(&self.lock()).get_project(key)
    }

    pub fn create_project(&self, key: ProjectKey, fields: &ProjectFields) -> RepoResult<()> {
        self.write(Table::Project, "create", &key, |conn| {
            SqliteProjectRepository::new(conn).create_project(key, fields)
        })
    }

    pub fn update_project(&self, key: ProjectKey, fields: &ProjectFields) -> RepoResult<()> {
        self.write(Table::Project, "update", &key, |conn| {
            SqliteProjectRepository::new(conn).update_project(key, fields)
        })
    }

    pub fn delete_project(&self, key: ProjectKey) -> RepoResult<()> {
        self.write(Table::Project, "delete", &key, |conn| {
            SqliteProjectRepository::new(conn).delete_project(key)
        })
    }

    // Payroll

    pub fn list_payrolls(&self) -> RepoResult<Vec<PayrollRecord>> {
        SqlitePayrollRepository::new(&self.lock()).list_payrolls()
    }

    pub fn get_payroll(&self, id: PayrollId) -> RepoResult<Option<PayrollRecord>> {
        SqlitePayrollRepository::new(&self.lock()).get_payroll(id)
    }

    pub fn create_payroll(&self, fields: &PayrollFields) -> RepoResult<PayrollId> {
        self.write(Table::Payroll, "create", &"new", |conn| {
            SqlitePayrollRepository::new(conn).create_payroll(fields)
        })
    }

    pub fn update_payroll(&self, id: PayrollId, fields: &PayrollFields) -> RepoResult<()> {
        self.write(Table::Payroll, "update", &id, |conn| {
            SqlitePayrollRepository::new(conn).update_payroll(id, fields)
        })
    }

    pub fn delete_payroll(&self, id: PayrollId) -> RepoResult<()> {
        self.write(Table::Payroll, "delete", &id, |conn| {
            SqlitePayrollRepository::new(conn).delete_payroll(id)
        })
    }
}
