//! Typed record models for the seven employee-management entities.
//!
//! # Responsibility
//! - Define the typed field sets accepted by create/update calls.
//! - Define enriched read models returned by list/get calls.
//!
//! # Invariants
//! - `*Fields` structs carry every non-key column; updates replace all of them.
//! - `*Record` structs pair the key with its fields plus optional display
//!   enrichment, which is `None` when the referenced row is absent.
//! - Serialized names match the legacy column names.

pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave;
pub mod payroll;
pub mod position;
pub mod project;

/// Store-assigned `Department.DepartmentID`.
pub type DepartmentId = i64;
/// Store-assigned `Position.PositionID`.
pub type PositionId = i64;
/// Store-assigned `Employee_details.EmployeeID`.
pub type EmployeeId = i64;
/// Store-assigned `Attendance.AttendanceID`.
pub type AttendanceId = i64;
/// Store-assigned `Leave.LeaveID`.
pub type LeaveId = i64;
/// Store-assigned `Payroll.PayrollID`.
pub type PayrollId = i64;
/// Team reference. There is no team table; the value is opaque.
pub type TeamId = i64;
