use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Nine-digit employee identifier.
pub type EmployeeId = u32;

/// Department row, created once from the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub department_id: u32,
    pub name: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

/// Position row; `department_id` always references a catalog department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub position_id: u32,
    pub title: String,
    pub department_id: u32,
    pub description: String,
    pub created_at: NaiveDateTime,
}

/// Single emergency contact entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// Structured emergency-contact payload stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EmergencyContacts {
    pub contacts: Vec<EmergencyContact>,
}

/// Employee row. Immutable once pushed into the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub hire_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub active: bool,
    pub department_id: u32,
    pub position_id: u32,
    pub manager_id: Option<EmployeeId>,
    pub emergency_contacts: EmergencyContacts,
    /// Empty when the employee carries no note.
    pub notes: String,
    pub created_at: NaiveDateTime,
}

/// Payroll entry; the amount is kept in cents to avoid float drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollEntry {
    pub payroll_id: u64,
    pub employee_id: EmployeeId,
    pub amount_cents: i64,
    pub pay_date: NaiveDate,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeLicense {
    pub license_id: u64,
    pub employee_id: EmployeeId,
    pub license_name: String,
    pub issued_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

/// On-call shift; `day_of_week` is 1 (Monday) through 7 (Sunday).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OncallShift {
    pub shift_id: u64,
    pub employee_id: EmployeeId,
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub escalation_order: u8,
    pub created_at: NaiveDateTime,
}

/// Ordered, append-only collection of generated employees.
///
/// Generation order is the roster order; dependent tables read hire dates
/// and identifiers from here, and manager references always point at an
/// earlier slot.
#[derive(Debug, Clone, Default)]
pub struct EmployeeRoster {
    employees: Vec<Employee>,
    slots: HashMap<EmployeeId, usize>,
}

impl EmployeeRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            employees: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    /// Appends an employee and returns its slot.
    pub fn push(&mut self, employee: Employee) -> usize {
        let slot = self.employees.len();
        self.slots.insert(employee.employee_id, slot);
        self.employees.push(employee);
        slot
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Employee> {
        self.employees.get(slot)
    }

    /// Generation slot of an employee identifier.
    pub fn slot_of(&self, employee_id: EmployeeId) -> Option<usize> {
        self.slots.get(&employee_id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Employee> {
        self.employees.iter()
    }

    pub fn as_slice(&self) -> &[Employee] {
        &self.employees
    }
}

impl<'a> IntoIterator for &'a EmployeeRoster {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.iter()
    }
}
