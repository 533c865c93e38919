//! Request-boundary parsing from loosely typed form fields.
//!
//! # Responsibility
//! - Turn string key/value form input into typed `*Fields` structs.
//! - Reject malformed input before it reaches any repository.
//!
//! # Invariants
//! - Form keys are the legacy column names (`DeptName`, `HireDate`, ...).
//! - Keys that are not part of an entity's schema are ignored.
//! - An empty value for a nullable reference reads as `None`.
//! - Text fields are taken verbatim (no trimming).

use crate::model::attendance::AttendanceFields;
use crate::model::department::DepartmentFields;
use crate::model::employee::EmployeeFields;
use crate::model::leave::LeaveFields;
use crate::model::payroll::PayrollFields;
use crate::model::position::PositionFields;
use crate::model::project::{ProjectFields, ProjectKey};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Digits after the point that a `DECIMAL(10,2)` amount keeps.
pub const AMOUNT_SCALE: u32 = 2;
/// Exclusive magnitude bound of a `DECIMAL(10,2)` amount.
pub const AMOUNT_LIMIT: i64 = 100_000_000;

pub type InputResult<T> = Result<T, InputError>;

/// Malformed caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    MissingField(&'static str),
    InvalidInteger { field: &'static str, value: String },
    InvalidDate { field: &'static str, value: String },
    InvalidDecimal { field: &'static str, value: String },
    DecimalOutOfRange { field: &'static str, value: String },
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidInteger { field, value } => {
                write!(f, "field `{field}` expects an integer, got `{value}`")
            }
            Self::InvalidDate { field, value } => {
                write!(f, "field `{field}` expects a YYYY-MM-DD date, got `{value}`")
            }
            Self::InvalidDecimal { field, value } => {
                write!(f, "field `{field}` expects a decimal amount, got `{value}`")
            }
            Self::DecimalOutOfRange { field, value } => write!(
                f,
                "field `{field}` must fit DECIMAL(10,2) (below {AMOUNT_LIMIT}, at most \
                 {AMOUNT_SCALE} decimal places), got `{value}`"
            ),
        }
    }
}

impl Error for InputError {}

/// Raw form submission keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and request adapters.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn text(&self, field: &'static str) -> InputResult<String> {
        self.get(field)
            .map(str::to_string)
            .ok_or(InputError::MissingField(field))
    }

    fn integer(&self, field: &'static str) -> InputResult<i64> {
        let raw = self.get(field).ok_or(InputError::MissingField(field))?;
        parse_integer(field, raw)
    }

    fn optional_integer(&self, field: &'static str) -> InputResult<Option<i64>> {
        match self.get(field).map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_integer(field, raw).map(Some),
        }
    }

    fn date(&self, field: &'static str) -> InputResult<NaiveDate> {
        let raw = self.get(field).ok_or(InputError::MissingField(field))?;
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| InputError::InvalidDate {
            field,
            value: raw.to_string(),
        })
    }

    fn decimal(&self, field: &'static str) -> InputResult<Decimal> {
        let raw = self.get(field).ok_or(InputError::MissingField(field))?;
        let value = Decimal::from_str(raw.trim()).map_err(|_| InputError::InvalidDecimal {
            field,
            value: raw.to_string(),
        })?;
        check_amount(field, &value)?;
        Ok(value)
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut form = Self::new();
        for (key, value) in iter {
            form.insert(key, value);
        }
        form
    }
}

/// Conversion from raw form input into a typed field set.
pub trait FromForm: Sized {
    fn from_form(form: &FormData) -> InputResult<Self>;
}

/// Parses a single-integer record key taken from a request path.
pub fn parse_key(raw: &str) -> InputResult<i64> {
    parse_integer("id", raw)
}

impl ProjectKey {
    /// Parses the two-part project key taken from a request path.
    pub fn parse(employee_id: &str, team_id: &str) -> InputResult<Self> {
        Ok(Self::new(
            parse_integer("EmployeeID", employee_id)?,
            parse_integer("TeamID", team_id)?,
        ))
    }
}

impl FromForm for ProjectKey {
    fn from_form(form: &FormData) -> InputResult<Self> {
        Ok(Self::new(form.integer("EmployeeID")?, form.integer("TeamID")?))
    }
}

impl FromForm for DepartmentFields {
    fn from_form(form: &FormData) -> InputResult<Self> {
        Ok(Self {
            name: form.text("DeptName")?,
            location: form.text("Location")?,
        })
    }
}

impl FromForm for PositionFields {
    fn from_form(form: &FormData) -> InputResult<Self> {
        Ok(Self {
            name: form.text("PositionName")?,
            department_id: form.optional_integer("DepartmentID")?,
        })
    }
}

impl FromForm for EmployeeFields {
    fn from_form(form: &FormData) -> InputResult<Self> {
        Ok(Self {
            name: form.text("EmployeeName")?,
            hire_date: form.date("HireDate")?,
            experience: form.text("Experience")?,
            position_id: form.optional_integer("PositionID")?,
            gender: form.text("Gender")?,
            department_id: form.optional_integer("DepartmentID")?,
            email: form.text("Email")?,
            phone: form.text("Phone")?,
            status: form.text("Status")?,
            date_of_birth: form.text("DOB")?,
            salary: form.text("Salary")?,
            team_id: form.optional_integer("TeamID")?,
        })
    }
}

impl FromForm for AttendanceFields {
    fn from_form(form: &FormData) -> InputResult<Self> {
        Ok(Self {
            employee_id: form.integer("EmployeeID")?,
            date: form.date("Date")?,
            status: form.text("Status")?,
        })
    }
}

impl FromForm for LeaveFields {
    fn from_form(form: &FormData) -> InputResult<Self> {
        Ok(Self {
            employee_id: form.integer("EmployeeID")?,
            start_date: form.date("StartDate")?,
            end_date: form.date("EndDate")?,
            reason: form.text("Reason")?,
            status: form.text("Status")?,
        })
    }
}

impl FromForm for ProjectFields {
    fn from_form(form: &FormData) -> InputResult<Self> {
        Ok(Self {
            project_code: form.text("ProjectID")?,
            task: form.text("Task")?,
            status: form.text("Status")?,
            sprint: form.integer("Sprint")?,
        })
    }
}

impl FromForm for PayrollFields {
    fn from_form(form: &FormData) -> InputResult<Self> {
        Ok(Self {
            employee_id: form.integer("EmployeeID")?,
            month: form.text("Month")?,
            basic_pay: form.decimal("BasicPay")?,
            deductions: form.decimal("Deductions")?,
            net_pay: form.decimal("Netpay")?,
        })
    }
}

/// Rejects amounts that `DECIMAL(10,2)` storage cannot hold exactly.
pub fn check_amount(field: &'static str, value: &Decimal) -> InputResult<()> {
    if value.normalize().scale() > AMOUNT_SCALE || value.abs() >= Decimal::from(AMOUNT_LIMIT) {
        return Err(InputError::DecimalOutOfRange {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse_integer(field: &'static str, raw: &str) -> InputResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| InputError::InvalidInteger {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{check_amount, parse_key, FormData, FromForm, InputError};
    use crate::model::department::DepartmentFields;
    use crate::model::payroll::PayrollFields;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use crate::model::position::PositionFields;
    use crate::model::project::ProjectKey;

    #[test]
    fn parse_key_rejects_non_numeric_ids() {
        assert_eq!(parse_key(" 42 "), Ok(42));
        assert_eq!(
            parse_key("abc"),
            Err(InputError::InvalidInteger {
                field: "id",
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn unknown_form_keys_are_ignored() {
        let form = FormData::new()
            .with("DeptName", "IT")
            .with("Location", "Floor 1")
            .with("csrf_token", "ignored");

        let fields = DepartmentFields::from_form(&form).expect("form should parse");
        assert_eq!(fields, DepartmentFields::new("IT", "Floor 1"));
    }

    #[test]
    fn empty_reference_reads_as_none() {
        let form = FormData::new()
            .with("PositionName", "Developer")
            .with("DepartmentID", "");

        let fields = PositionFields::from_form(&form).expect("form should parse");
        assert_eq!(fields.department_id, None);
    }

    #[test]
    fn missing_text_field_is_reported_by_name() {
        let form = FormData::new().with("DeptName", "IT");
        let err = DepartmentFields::from_form(&form).expect_err("Location is required");
        assert_eq!(err, InputError::MissingField("Location"));
    }

    #[test]
    fn project_key_parse_names_the_bad_part() {
        let err = ProjectKey::parse("1", "x").expect_err("team must be numeric");
        assert!(matches!(err, InputError::InvalidInteger { field: "TeamID", .. }));
    }

    #[test]
    fn payroll_amounts_must_fit_two_decimal_places() {
        let form = |basic_pay: &str, net_pay: &str| {
            FormData::new()
                .with("EmployeeID", "1")
                .with("Month", "2024-01")
                .with("BasicPay", basic_pay)
                .with("Deductions", "0")
                .with("Netpay", net_pay)
        };

        let err = PayrollFields::from_form(&form("12345678901234567.89", "1.00")).unwrap_err();
        assert!(matches!(err, InputError::DecimalOutOfRange { field: "BasicPay", .. }));

        let err = PayrollFields::from_form(&form("1.00", "0.1234567890123456789")).unwrap_err();
        assert!(matches!(err, InputError::DecimalOutOfRange { field: "Netpay", .. }));

        let fields = PayrollFields::from_form(&form("99999999.99", "12.500")).unwrap();
        assert_eq!(fields.basic_pay.to_string(), "99999999.99");
    }

    #[test]
    fn amount_bounds_follow_decimal_10_2() {
        let amount = |raw: &str| Decimal::from_str(raw).unwrap();
        assert!(check_amount("BasicPay", &amount("-99999999.99")).is_ok());
        assert!(check_amount("BasicPay", &amount("100000000")).is_err());
        assert!(check_amount("BasicPay", &amount("0.001")).is_err());
    }
}
