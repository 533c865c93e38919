//! Payroll repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Amounts are written as decimal text; `DECIMAL(10,2)` affinity may store
//!   them as INTEGER or REAL, and reads accept all three forms.
//! - `Netpay` is persisted exactly as supplied.
//! - Amounts outside `DECIMAL(10,2)` are rejected before any write, so every
//!   stored amount reads back unchanged.

use crate::db::schema::Table;
use crate::form::check_amount;
use crate::model::payroll::{PayrollFields, PayrollRecord};
use crate::model::PayrollId;
use crate::repo::{
    ensure_connection_ready, in_row, read_decimal, read_key, read_text, RepoResult,
};
use rusqlite::{params, Connection, Row};

const PAYROLL_SELECT_SQL: &str = "SELECT
    p.PayrollID AS PayrollID,
    p.EmployeeID AS EmployeeID,
    p.Month AS Month,
    p.BasicPay AS BasicPay,
    p.Deductions AS Deductions,
    p.Netpay AS Netpay,
    e.EmployeeName AS EmployeeName
FROM Payroll p
LEFT JOIN Employee_details e ON p.EmployeeID = e.EmployeeID";

/// Repository interface for payroll CRUD operations.
pub trait PayrollRepository {
    fn list_payrolls(&self) -> RepoResult<Vec<PayrollRecord>>;
    fn get_payroll(&self, id: PayrollId) -> RepoResult<Option<PayrollRecord>>;
    fn create_payroll(&self, fields: &PayrollFields) -> RepoResult<PayrollId>;
    fn update_payroll(&self, id: PayrollId, fields: &PayrollFields) -> RepoResult<()>;
    fn delete_payroll(&self, id: PayrollId) -> RepoResult<()>;
}

/// SQLite-backed payroll repository.
pub struct SqlitePayrollRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePayrollRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[Table::Payroll, Table::Employee])?;
        Ok(Self::new(conn))
    }
}

impl PayrollRepository for SqlitePayrollRepository<'_> {
    fn list_payrolls(&self) -> RepoResult<Vec<PayrollRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAYROLL_SELECT_SQL} ORDER BY p.PayrollID ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_payroll_row(row)?);
        }
        Ok(records)
    }

    fn get_payroll(&self, id: PayrollId) -> RepoResult<Option<PayrollRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAYROLL_SELECT_SQL} WHERE p.PayrollID = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_payroll_row(row)?));
        }
        Ok(None)
    }

    fn create_payroll(&self, fields: &PayrollFields) -> RepoResult<PayrollId> {
        check_amounts(fields)?;
        self.conn.execute(
            "INSERT INTO Payroll (EmployeeID, Month, BasicPay, Deductions, Netpay)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                fields.employee_id,
                fields.month.as_str(),
                fields.basic_pay.to_string(),
                fields.deductions.to_string(),
                fields.net_pay.to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_payroll(&self, id: PayrollId, fields: &PayrollFields) -> RepoResult<()> {
        check_amounts(fields)?;
        self.conn.execute(
            "UPDATE Payroll
             SET
                EmployeeID = ?1,
                Month = ?2,
                BasicPay = ?3,
                Deductions = ?4,
                Netpay = ?5
             WHERE PayrollID = ?6;",
            params![
                fields.employee_id,
                fields.month.as_str(),
                fields.basic_pay.to_string(),
                fields.deductions.to_string(),
                fields.net_pay.to_string(),
                id,
            ],
        )?;
        Ok(())
    }

    fn delete_payroll(&self, id: PayrollId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM Payroll WHERE PayrollID = ?1;", [id])?;
        Ok(())
    }
}

fn check_amounts(fields: &PayrollFields) -> RepoResult<()> {
    check_amount("BasicPay", &fields.basic_pay)?;
    check_amount("Deductions", &fields.deductions)?;
    check_amount("Netpay", &fields.net_pay)?;
    Ok(())
}

fn parse_payroll_row(row: &Row<'_>) -> RepoResult<PayrollRecord> {
    let id: PayrollId = row.get("PayrollID")?;
    let fields = in_row(parse_payroll_fields(row), Table::Payroll, id)?;
    Ok(PayrollRecord {
        id,
        fields,
        employee_name: row.get("EmployeeName")?,
    })
}

fn parse_payroll_fields(row: &Row<'_>) -> RepoResult<PayrollFields> {
    Ok(PayrollFields {
        employee_id: read_key(row, Table::Payroll, "EmployeeID")?,
        month: read_text(row, "Month")?,
        basic_pay: read_decimal(row, Table::Payroll, "BasicPay")?,
        deductions: read_decimal(row, Table::Payroll, "Deductions")?,
        net_pay: read_decimal(row, Table::Payroll, "Netpay")?,
    })
}
