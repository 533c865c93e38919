//! Legacy table layout.
//!
//! Table and column names are kept byte-for-byte compatible with databases
//! and CSV snapshots produced before the migration registry existed.

use std::fmt::{Display, Formatter};

/// One of the seven record tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Department,
    Position,
    Employee,
    Attendance,
    Leave,
    Project,
    Payroll,
}

impl Table {
    /// All tables in dependency order (referenced tables first).
    pub const ALL: [Table; 7] = [
        Table::Department,
        Table::Position,
        Table::Employee,
        Table::Attendance,
        Table::Leave,
        Table::Project,
        Table::Payroll,
    ];

    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::Position => "Position",
            Self::Employee => "Employee_details",
            Self::Attendance => "Attendance",
            Self::Leave => "Leave",
            Self::Project => "Project",
            Self::Payroll => "Payroll",
        }
    }

    /// Columns every migrated database must carry, in declaration order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Department => &["DepartmentID", "DeptName", "Location"],
            Self::Position => &["PositionID", "PositionName", "DepartmentID"],
            Self::Employee => &[
                "EmployeeID",
                "EmployeeName",
                "HireDate",
                "Experience",
                "Position",
                "Gender",
                "DepartmentID",
                "Email",
                "Phone",
                "Status",
                "DOB",
                "Salary",
                "TeamID",
                "PositionID",
            ],
            Self::Attendance => &["AttendanceID", "EmployeeID", "Date", "Status"],
            Self::Leave => &[
                "LeaveID",
                "EmployeeID",
                "StartDate",
                "EndDate",
                "Reason",
                "Status",
            ],
            Self::Project => &[
                "EmployeeID",
                "TeamID",
                "ProjectID",
                "Task",
                "Status",
                "Sprint",
            ],
            Self::Payroll => &[
                "PayrollID",
                "EmployeeID",
                "Month",
                "BasicPay",
                "Deductions",
                "Netpay",
            ],
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
