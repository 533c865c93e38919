//! Project assignment model.
//!
//! # Invariants
//! - Identity is the `(employee_id, team_id)` pair; there is no surrogate key.
//! - `project_code` (column `ProjectID`) is unique across all rows and is a
//!   business identifier, not part of the key.

use super::{EmployeeId, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Composite primary key of a project row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectKey {
    #[serde(rename = "EmployeeID")]
    pub employee_id: EmployeeId,
    #[serde(rename = "TeamID")]
    pub team_id: TeamId,
}

impl ProjectKey {
    pub fn new(employee_id: EmployeeId, team_id: TeamId) -> Self {
        Self {
            employee_id,
            team_id,
        }
    }
}

impl Display for ProjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "employee={} team={}", self.employee_id, self.team_id)
    }
}

/// Writable non-key project fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    #[serde(rename = "ProjectID")]
    pub project_code: String,
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Sprint")]
    pub sprint: i64,
}

/// Project row enriched with the employee display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(flatten)]
    pub key: ProjectKey,
    #[serde(flatten)]
    pub fields: ProjectFields,
    #[serde(rename = "EmployeeName")]
    pub employee_name: Option<String>,
}
