//! Column layouts of the six personnel tables.

use personnel_core::{
    Department, Employee, EmployeeLicense, OncallShift, PayrollEntry, Position,
};

use super::sql::{InsertRow, SqlValue};

impl InsertRow for Department {
    const TABLE: &'static str = "department";
    const COLUMNS: &'static [&'static str] =
        &["department_id", "name", "description", "created_at"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.department_id.into()),
            SqlValue::text(&self.name),
            SqlValue::text(&self.description),
            SqlValue::Timestamp(self.created_at),
        ]
    }
}

impl InsertRow for Position {
    const TABLE: &'static str = "position";
    const COLUMNS: &'static [&'static str] = &[
        "position_id",
        "title",
        "department_id",
        "description",
        "created_at",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.position_id.into()),
            SqlValue::text(&self.title),
            SqlValue::Int(self.department_id.into()),
            SqlValue::text(&self.description),
            SqlValue::Timestamp(self.created_at),
        ]
    }
}

impl InsertRow for Employee {
    const TABLE: &'static str = "employee";
    const COLUMNS: &'static [&'static str] = &[
        "employee_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "address",
        "birth_date",
        "hire_date",
        "termination_date",
        "active",
        "department_id",
        "position_id",
        "manager_id",
        "emergency_contacts",
        "notes",
        "created_at",
    ];

    fn values(&self) -> Vec<SqlValue> {
        // A struct of plain strings always serializes.
        let contacts = serde_json::to_string(&self.emergency_contacts).unwrap_or_default();
        vec![
            SqlValue::Int(self.employee_id.into()),
            SqlValue::text(&self.first_name),
            SqlValue::text(&self.last_name),
            SqlValue::text(&self.email),
            SqlValue::text(&self.phone),
            SqlValue::text(&self.address),
            SqlValue::Date(self.birth_date),
            SqlValue::Date(self.hire_date),
            SqlValue::optional(self.termination_date, SqlValue::Date),
            SqlValue::Bool(self.active),
            SqlValue::Int(self.department_id.into()),
            SqlValue::Int(self.position_id.into()),
            SqlValue::optional(self.manager_id, |id| SqlValue::Int(id.into())),
            SqlValue::Text(contacts),
            SqlValue::text(&self.notes),
            SqlValue::Timestamp(self.created_at),
        ]
    }
}

impl InsertRow for PayrollEntry {
    const TABLE: &'static str = "payroll";
    const COLUMNS: &'static [&'static str] = &[
        "payroll_id",
        "employee_id",
        "amount",
        "pay_date",
        "notes",
        "created_at",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.payroll_id as i64),
            SqlValue::Int(self.employee_id.into()),
            SqlValue::Money(self.amount_cents),
            SqlValue::Date(self.pay_date),
            SqlValue::text(&self.notes),
            SqlValue::Timestamp(self.created_at),
        ]
    }
}

impl InsertRow for EmployeeLicense {
    const TABLE: &'static str = "employee_license";
    const COLUMNS: &'static [&'static str] = &[
        "license_id",
        "employee_id",
        "license_name",
        "issued_date",
        "expiry_date",
        "notes",
        "created_at",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.license_id as i64),
            SqlValue::Int(self.employee_id.into()),
            SqlValue::text(&self.license_name),
            SqlValue::Date(self.issued_date),
            SqlValue::Date(self.expiry_date),
            SqlValue::text(&self.notes),
            SqlValue::Timestamp(self.created_at),
        ]
    }
}

impl InsertRow for OncallShift {
    const TABLE: &'static str = "oncall_shift";
    const COLUMNS: &'static [&'static str] = &[
        "shift_id",
        "employee_id",
        "day_of_week",
        "start_time",
        "end_time",
        "escalation_order",
        "created_at",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.shift_id as i64),
            SqlValue::Int(self.employee_id.into()),
            SqlValue::Int(self.day_of_week.into()),
            SqlValue::Time(self.start_time),
            SqlValue::Time(self.end_time),
            SqlValue::Int(self.escalation_order.into()),
            SqlValue::Timestamp(self.created_at),
        ]
    }
}
