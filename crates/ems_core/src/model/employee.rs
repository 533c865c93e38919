//! Employee model.
//!
//! # Invariants
//! - `position_id` is the authoritative position reference. The legacy
//!   `Position` text column is derived from it on every write and is not
//!   part of the writable field set.
//! - `date_of_birth` and `salary` are free text, stored unvalidated.

use super::{DepartmentId, EmployeeId, PositionId, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Writable employee fields. Every field is replaced on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFields {
    #[serde(rename = "EmployeeName")]
    pub name: String,
    #[serde(rename = "HireDate")]
    pub hire_date: NaiveDate,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "PositionID")]
    pub position_id: Option<PositionId>,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "DepartmentID")]
    pub department_id: Option<DepartmentId>,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "DOB")]
    pub date_of_birth: String,
    #[serde(rename = "Salary")]
    pub salary: String,
    #[serde(rename = "TeamID")]
    pub team_id: Option<TeamId>,
}

/// Employee row enriched with department and position display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "EmployeeID")]
    pub id: EmployeeId,
    #[serde(flatten)]
    pub fields: EmployeeFields,
    /// `None` when the department is unset or no longer exists.
    #[serde(rename = "DeptName")]
    pub dept_name: Option<String>,
    /// `None` when the position is unset or no longer exists.
    #[serde(rename = "PositionName")]
    pub position_name: Option<String>,
}
