//! Leave request model.

use super::{EmployeeId, LeaveId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Writable leave fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveFields {
    #[serde(rename = "EmployeeID")]
    pub employee_id: EmployeeId,
    #[serde(rename = "StartDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "EndDate")]
    pub end_date: NaiveDate,
    #[serde(rename = "Reason")]
    pub reason: String,
    /// Free text such as `pending`, `approved` or `rejected`.
    #[serde(rename = "Status")]
    pub status: String,
}

/// Leave row enriched with the employee display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    #[serde(rename = "LeaveID")]
    pub id: LeaveId,
    #[serde(flatten)]
    pub fields: LeaveFields,
    #[serde(rename = "EmployeeName")]
    pub employee_name: Option<String>,
}
