//! Core contracts for the personnel dataset synthesizer.
//!
//! This crate defines the entity records, the append-only employee roster,
//! the cross-field constraint predicates and the static reference catalog
//! shared by the generator and the CLI.

pub mod calendar;
pub mod catalog;
pub mod constraints;
pub mod entities;

pub use calendar::{DateWindow, years_before};
pub use catalog::{DepartmentSeed, PositionSeed};
pub use constraints::{
    MAX_HIRE_AGE, MIN_HIRE_AGE, age_at, birth_within_age_range, hire_before_pay,
    hire_before_termination,
};
pub use entities::{
    Department, EmergencyContact, EmergencyContacts, Employee, EmployeeId, EmployeeLicense,
    EmployeeRoster, OncallShift, PayrollEntry, Position,
};

/// Smallest employee identifier: nine digits, leading digit nonzero.
pub const EMPLOYEE_ID_MIN: EmployeeId = 100_000_000;
/// Largest employee identifier.
pub const EMPLOYEE_ID_MAX: EmployeeId = 999_999_999;
/// Number of distinct employee identifiers available.
pub const EMPLOYEE_ID_SPACE: u64 = (EMPLOYEE_ID_MAX - EMPLOYEE_ID_MIN) as u64 + 1;
