use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use personnel_core::{
    DateWindow, Department, Employee, EmployeeLicense, EmployeeRoster, OncallShift,
    PayrollEntry, Position,
};

use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationReport, RepairLog, TableReport};
use crate::output::{InsertRow, write_table_sql};
use crate::primitives::unique_employee_ids;
use crate::sequences::{SEQUENCE_TARGETS, write_sequences_sql};
use crate::synth::{self, EmployeeSynthesizer};

/// File name of the sequence reconciliation artifact.
pub const SEQUENCES_FILE: &str = "set_sequences.sql";

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub out_dir: PathBuf,
    pub report: GenerationReport,
}

/// Every table of one run, held in memory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub seed: u64,
    pub departments: Vec<Department>,
    pub positions: Vec<Position>,
    pub employees: EmployeeRoster,
    pub payroll: Vec<PayrollEntry>,
    pub licenses: Vec<EmployeeLicense>,
    pub shifts: Vec<OncallShift>,
    pub repairs: RepairLog,
}

/// Receives each table as soon as it has been generated, in dependency
/// order.
pub trait TableSink {
    fn departments(&mut self, rows: &[Department]) -> Result<(), GenerationError>;
    fn positions(&mut self, rows: &[Position]) -> Result<(), GenerationError>;
    fn employees(&mut self, roster: &EmployeeRoster) -> Result<(), GenerationError>;
    fn payroll(&mut self, rows: Vec<PayrollEntry>) -> Result<(), GenerationError>;
    fn licenses(&mut self, rows: Vec<EmployeeLicense>) -> Result<(), GenerationError>;
    fn oncall_shifts(&mut self, rows: Vec<OncallShift>) -> Result<(), GenerationError>;
}

impl TableSink for Dataset {
    fn departments(&mut self, rows: &[Department]) -> Result<(), GenerationError> {
        self.departments = rows.to_vec();
        Ok(())
    }

    fn positions(&mut self, rows: &[Position]) -> Result<(), GenerationError> {
        self.positions = rows.to_vec();
        Ok(())
    }

    fn employees(&mut self, roster: &EmployeeRoster) -> Result<(), GenerationError> {
        self.employees = roster.clone();
        Ok(())
    }

    fn payroll(&mut self, rows: Vec<PayrollEntry>) -> Result<(), GenerationError> {
        self.payroll = rows;
        Ok(())
    }

    fn licenses(&mut self, rows: Vec<EmployeeLicense>) -> Result<(), GenerationError> {
        self.licenses = rows;
        Ok(())
    }

    fn oncall_shifts(&mut self, rows: Vec<OncallShift>) -> Result<(), GenerationError> {
        self.shifts = rows;
        Ok(())
    }
}

/// Writes each table to `<out_dir>/<table>.sql` and drops it afterwards.
struct SqlFileSink<'a> {
    out_dir: &'a Path,
    batch_size: usize,
    report: GenerationReport,
}

impl SqlFileSink<'_> {
    fn write<R: InsertRow>(&mut self, rows: &[R]) -> Result<(), GenerationError> {
        let start = Instant::now();
        let path = self.out_dir.join(format!("{}.sql", R::TABLE));
        let written = write_table_sql(&path, rows, self.batch_size)?;

        info!(
            table = R::TABLE,
            path = %path.display(),
            rows = written.rows,
            statements = written.statements,
            bytes = written.bytes,
            duration_ms = start.elapsed().as_millis() as u64,
            "table written"
        );

        self.report.bytes_written += written.bytes;
        self.report.tables.push(TableReport {
            table: R::TABLE.to_string(),
            path,
            rows: written.rows,
            statements: written.statements,
            bytes: written.bytes,
        });
        Ok(())
    }
}

impl TableSink for SqlFileSink<'_> {
    fn departments(&mut self, rows: &[Department]) -> Result<(), GenerationError> {
        self.write(rows)
    }

    fn positions(&mut self, rows: &[Position]) -> Result<(), GenerationError> {
        self.write(rows)
    }

    fn employees(&mut self, roster: &EmployeeRoster) -> Result<(), GenerationError> {
        self.write(roster.as_slice())
    }

    fn payroll(&mut self, rows: Vec<PayrollEntry>) -> Result<(), GenerationError> {
        self.write(&rows)
    }

    fn licenses(&mut self, rows: Vec<EmployeeLicense>) -> Result<(), GenerationError> {
        self.write(&rows)
    }

    fn oncall_shifts(&mut self, rows: Vec<OncallShift>) -> Result<(), GenerationError> {
        self.write(&rows)
    }
}

/// Entry point for synthesizing the personnel dataset.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Generates every table and writes the SQL artifacts.
    ///
    /// Options are validated before the output directory is created, so an
    /// exhausted identifier space leaves nothing on disk. A write failure
    /// aborts the run; artifacts of earlier tables stay where they are.
    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        self.options.validate()?;
        let start = Instant::now();
        let seed = self.resolve_seed();
        let run_id = uuid::Uuid::new_v4().to_string();
        let out_dir = self.options.out_dir.clone();

        std::fs::create_dir_all(&out_dir).map_err(GenerationError::destination(&out_dir))?;

        info!(
            run_id = %run_id,
            seed,
            employees = self.options.employees,
            out_dir = %out_dir.display(),
            "generation started"
        );

        let mut sink = SqlFileSink {
            out_dir: &out_dir,
            batch_size: self.options.batch_size,
            report: GenerationReport::new(run_id.clone(), seed),
        };
        let repairs = self.drive(seed, &mut sink)?;
        let mut report = sink.report;

        for (code, count) in repairs.iter() {
            info!(code, count, "repairs applied");
        }
        repairs.merge_into(&mut report.repairs);

        if self.options.write_sequences {
            let path = out_dir.join(SEQUENCES_FILE);
            report.bytes_written += write_sequences_sql(&path, SEQUENCE_TARGETS)?;
            info!(path = %path.display(), "sequences written");
            report.sequences_path = Some(path);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            bytes_written = report.bytes_written,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult { out_dir, report })
    }

    /// Generates every table in memory without touching the filesystem.
    pub fn synthesize(&self) -> Result<Dataset, GenerationError> {
        self.options.validate()?;
        let seed = self.resolve_seed();
        let mut dataset = Dataset {
            seed,
            ..Dataset::default()
        };
        dataset.repairs = self.drive(seed, &mut dataset)?;
        Ok(dataset)
    }

    /// Generates the tables in dependency order and hands each to `sink`.
    /// Every table draws from its own generator derived from `seed`.
    pub fn drive<S: TableSink>(&self, seed: u64, sink: &mut S) -> Result<RepairLog, GenerationError> {
        let window = DateWindow::global();
        let mut repairs = RepairLog::new();

        let departments = synth::departments(&mut table_rng(seed, Department::TABLE), &window)?;
        log_generated(Department::TABLE, departments.len());
        sink.departments(&departments)?;

        let positions = synth::positions(&mut table_rng(seed, Position::TABLE), &window)?;
        log_generated(Position::TABLE, positions.len());
        sink.positions(&positions)?;

        let roster = self.employees(seed, window, &departments, &positions, &mut repairs)?;
        log_generated(Employee::TABLE, roster.len());
        sink.employees(&roster)?;

        let payroll = synth::payroll(
            &mut table_rng(seed, PayrollEntry::TABLE),
            &self.options,
            &roster,
            &window,
            &mut repairs,
        )?;
        log_generated(PayrollEntry::TABLE, payroll.len());
        sink.payroll(payroll)?;

        let licenses = synth::licenses(
            &mut table_rng(seed, EmployeeLicense::TABLE),
            &self.options,
            &roster,
            &window,
            &mut repairs,
        )?;
        log_generated(EmployeeLicense::TABLE, licenses.len());
        sink.licenses(licenses)?;

        let shifts = synth::oncall_shifts(
            &mut table_rng(seed, OncallShift::TABLE),
            &self.options,
            &roster,
            &window,
            &mut repairs,
        )?;
        log_generated(OncallShift::TABLE, shifts.len());
        sink.oncall_shifts(shifts)?;

        Ok(repairs)
    }

    fn employees(
        &self,
        seed: u64,
        window: DateWindow,
        departments: &[Department],
        positions: &[Position],
        repairs: &mut RepairLog,
    ) -> Result<EmployeeRoster, GenerationError> {
        let mut rng = table_rng(seed, Employee::TABLE);
        let ids = unique_employee_ids(&mut rng, self.options.employees)?;
        let mut synthesizer = EmployeeSynthesizer::new(&self.options, window, departments, positions);
        let mut roster = EmployeeRoster::with_capacity(ids.len());
        for employee_id in ids {
            let employee = synthesizer.synthesize(&mut rng, employee_id, &roster, repairs)?;
            roster.push(employee);
        }
        Ok(roster)
    }

    fn resolve_seed(&self) -> u64 {
        self.options.seed.unwrap_or_else(|| rand::rng().random())
    }
}

fn log_generated(table: &str, rows: usize) {
    info!(table, rows, "table generated");
}

fn table_rng(seed: u64, table: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_seed(seed, table))
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_seeds_differ_per_table() {
        let seeds: std::collections::HashSet<u64> = SEQUENCE_TARGETS
            .iter()
            .map(|target| hash_seed(7, target.table))
            .collect();
        assert_eq!(seeds.len(), SEQUENCE_TARGETS.len());
        assert_eq!(hash_seed(7, "employee"), hash_seed(7, "employee"));
    }
}
