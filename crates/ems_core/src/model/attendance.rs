//! Attendance model.

use super::{AttendanceId, EmployeeId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Writable attendance fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFields {
    /// Not checked on write; may point at a missing employee.
    #[serde(rename = "EmployeeID")]
    pub employee_id: EmployeeId,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Free text such as `present` or `absent`.
    #[serde(rename = "Status")]
    pub status: String,
}

/// Attendance row enriched with the employee display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "AttendanceID")]
    pub id: AttendanceId,
    #[serde(flatten)]
    pub fields: AttendanceFields,
    #[serde(rename = "EmployeeName")]
    pub employee_name: Option<String>,
}
