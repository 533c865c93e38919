//! Position model.

use super::{DepartmentId, PositionId};
use serde::{Deserialize, Serialize};

/// Writable position fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFields {
    #[serde(rename = "PositionName")]
    pub name: String,
    /// Must name an existing department when set.
    #[serde(rename = "DepartmentID")]
    pub department_id: Option<DepartmentId>,
}

impl PositionFields {
    pub fn new(name: impl Into<String>, department_id: Option<DepartmentId>) -> Self {
        Self {
            name: name.into(),
            department_id,
        }
    }
}

/// Position row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    #[serde(rename = "PositionID")]
    pub id: PositionId,
    #[serde(flatten)]
    pub fields: PositionFields,
}
