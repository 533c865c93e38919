//! Record store for a small employee-management system.
//!
//! Seven tables (departments, positions, employees, attendance, leave,
//! projects, payroll) live in one SQLite file. [`RecordStore`] is the entry
//! point; [`form`] turns loosely typed request input into the typed field
//! sets it accepts.

pub mod config;
pub mod db;
pub mod export;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod store;

pub use config::{DeletePolicy, StoreConfig, StoreLocation};
pub use db::schema::Table;
pub use export::{export_csv, ExportError};
pub use form::{check_amount, parse_key, FormData, FromForm, InputError, InputResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendance::{AttendanceFields, AttendanceRecord};
pub use model::department::{DepartmentFields, DepartmentRecord};
pub use model::employee::{EmployeeFields, EmployeeRecord};
pub use model::leave::{LeaveFields, LeaveRecord};
pub use model::payroll::{PayrollFields, PayrollRecord};
pub use model::position::{PositionFields, PositionRecord};
pub use model::project::{ProjectFields, ProjectKey, ProjectRecord};
pub use model::{
    AttendanceId, DepartmentId, EmployeeId, LeaveId, PayrollId, PositionId, TeamId,
};
pub use repo::{ErrorKind, RepoError, RepoResult};
pub use seed::{seed_demo_data, SeedSummary};
pub use store::RecordStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
