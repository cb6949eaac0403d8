use std::collections::BTreeMap;
use std::path::PathBuf;

use personnel_core::EMPLOYEE_ID_SPACE;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Inclusive row-count range drawn per employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str, min_floor: u32) -> Result<(), GenerationError> {
        if self.min > self.max {
            return Err(GenerationError::InvalidConfig(format!(
                "{name} min ({}) must be <= max ({})",
                self.min, self.max
            )));
        }
        if self.min < min_floor {
            return Err(GenerationError::InvalidConfig(format!(
                "{name} min must be >= {min_floor}"
            )));
        }
        Ok(())
    }
}

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Number of employee rows to generate.
    pub employees: u64,
    /// Directory where the SQL artifacts are written.
    pub out_dir: PathBuf,
    /// Maximum rows per INSERT statement.
    pub batch_size: usize,
    /// Run seed; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Emit `set_sequences.sql`.
    pub write_sequences: bool,
    /// Leading employees that never get a manager.
    pub manager_free_prefix: u64,
    /// Probability that a later employee has no manager.
    pub manager_free_rate: f64,
    /// Probability that an employee is terminated.
    pub termination_rate: f64,
    /// Probability that an employee carries a note.
    pub note_rate: f64,
    pub payroll_per_employee: CountRange,
    /// Fraction of employees that hold licenses.
    pub license_ratio: f64,
    /// Minimum number of license holders, capped by the employee count.
    pub license_floor: u64,
    pub licenses_per_employee: CountRange,
    pub shifts_per_employee: CountRange,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            employees: 100_000,
            out_dir: PathBuf::from("output_sql_explicit_ids"),
            batch_size: 1000,
            seed: None,
            write_sequences: true,
            manager_free_prefix: 100,
            manager_free_rate: 0.05,
            termination_rate: 0.02,
            note_rate: 0.35,
            payroll_per_employee: CountRange::new(1, 3),
            license_ratio: 0.5,
            license_floor: 10,
            licenses_per_employee: CountRange::new(1, 3),
            shifts_per_employee: CountRange::new(1, 5),
        }
    }
}

impl GenerateOptions {
    /// Checks every option before any file is touched.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.employees > EMPLOYEE_ID_SPACE {
            return Err(GenerationError::Exhausted {
                requested: self.employees,
                available: EMPLOYEE_ID_SPACE,
            });
        }
        if self.batch_size == 0 {
            return Err(GenerationError::InvalidConfig(
                "batch_size must be >= 1".to_string(),
            ));
        }
        for (name, rate) in [
            ("manager_free_rate", self.manager_free_rate),
            ("termination_rate", self.termination_rate),
            ("note_rate", self.note_rate),
            ("license_ratio", self.license_ratio),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        self.payroll_per_employee.validate("payroll_per_employee", 1)?;
        self.licenses_per_employee
            .validate("licenses_per_employee", 0)?;
        self.shifts_per_employee.validate("shifts_per_employee", 1)?;
        Ok(())
    }

    /// Number of employees out of `population` that receive license rows.
    pub fn license_holders(&self, population: u64) -> u64 {
        let by_ratio = (population as f64 * self.license_ratio) as u64;
        by_ratio.max(self.license_floor).min(population)
    }
}

/// Summary of one written SQL artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub path: PathBuf,
    pub rows: u64,
    pub statements: u64,
    pub bytes: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub sequences_path: Option<PathBuf>,
    /// Deterministic repairs applied, keyed by repair code.
    pub repairs: BTreeMap<String, u64>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            seed,
            tables: Vec::new(),
            sequences_path: None,
            repairs: BTreeMap::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn table(&self, table: &str) -> Option<&TableReport> {
        self.tables.iter().find(|report| report.table == table)
    }

    /// Row counts keyed by table name.
    pub fn row_counts(&self) -> BTreeMap<String, u64> {
        self.tables
            .iter()
            .map(|report| (report.table.clone(), report.rows))
            .collect()
    }
}

/// Counters for the deterministic repairs applied during synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairLog {
    counts: BTreeMap<&'static str, u64>,
}

impl RepairLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, code: &'static str) {
        *self.counts.entry(code).or_insert(0) += 1;
    }

    pub fn count(&self, code: &str) -> u64 {
        self.counts.get(code).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.counts.iter().map(|(code, count)| (*code, *count))
    }

    pub fn merge_into(&self, target: &mut BTreeMap<String, u64>) {
        for (code, count) in self.iter() {
            *target.entry(code.to_string()).or_insert(0) += count;
        }
    }
}
