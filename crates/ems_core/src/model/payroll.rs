//! Payroll model.
//!
//! `net_pay` is supplied by the caller. It is never derived from
//! `basic_pay` and `deductions`.

use super::{EmployeeId, PayrollId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Writable payroll fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollFields {
    #[serde(rename = "EmployeeID")]
    pub employee_id: EmployeeId,
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "BasicPay")]
    pub basic_pay: Decimal,
    #[serde(rename = "Deductions")]
    pub deductions: Decimal,
    #[serde(rename = "Netpay")]
    pub net_pay: Decimal,
}

/// Payroll row enriched with the employee display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    #[serde(rename = "PayrollID")]
    pub id: PayrollId,
    #[serde(flatten)]
    pub fields: PayrollFields,
    #[serde(rename = "EmployeeName")]
    pub employee_name: Option<String>,
}
