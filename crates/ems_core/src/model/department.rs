//! Department model.

use super::DepartmentId;
use serde::{Deserialize, Serialize};

/// Writable department fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentFields {
    #[serde(rename = "DeptName")]
    pub name: String,
    #[serde(rename = "Location")]
    pub location: String,
}

impl DepartmentFields {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

/// Department row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    #[serde(rename = "DepartmentID")]
    pub id: DepartmentId,
    #[serde(flatten)]
    pub fields: DepartmentFields,
}
