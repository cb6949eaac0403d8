//! Reconciliation of serial counters with explicitly assigned identifiers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::GenerationError;
use crate::output::sql::CountingWriter;

/// Serial sequence backing one table's identifier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTarget {
    pub sequence: &'static str,
    pub table: &'static str,
    pub column: &'static str,
}

const fn target(
    sequence: &'static str,
    table: &'static str,
    column: &'static str,
) -> SequenceTarget {
    SequenceTarget {
        sequence,
        table,
        column,
    }
}

/// One entry per generated table, in generation order.
pub const SEQUENCE_TARGETS: &[SequenceTarget] = &[
    target("department_department_id_seq", "department", "department_id"),
    target("position_position_id_seq", "position", "position_id"),
    target("employee_employee_id_seq", "employee", "employee_id"),
    target("payroll_payroll_id_seq", "payroll", "payroll_id"),
    target("employee_license_license_id_seq", "employee_license", "license_id"),
    target("oncall_shift_shift_id_seq", "oncall_shift", "shift_id"),
];

/// Statement that makes the next serial value one past the table's highest
/// identifier (1 for an empty table).
pub fn setval_statement(target: &SequenceTarget) -> String {
    format!(
        "SELECT setval('{}', COALESCE((SELECT MAX({}) FROM {}), 0) + 1, false);",
        target.sequence, target.column, target.table
    )
}

/// Writes the sequence artifact; returns the bytes written.
pub fn write_sequences_sql(path: &Path, targets: &[SequenceTarget]) -> Result<u64, GenerationError> {
    let write = || -> std::io::Result<u64> {
        let mut out = CountingWriter::new(BufWriter::new(File::create(path)?));
        out.write_all(
            b"-- Align serial sequences with the explicitly assigned identifiers\n\n",
        )?;
        for target in targets {
            writeln!(out, "{}", setval_statement(target))?;
        }
        out.flush()?;
        Ok(out.bytes_written())
    };
    write().map_err(GenerationError::destination(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_table_once() {
        let tables: Vec<_> = SEQUENCE_TARGETS.iter().map(|target| target.table).collect();
        assert_eq!(
            tables,
            vec![
                "department",
                "position",
                "employee",
                "payroll",
                "employee_license",
                "oncall_shift"
            ]
        );
    }

    #[test]
    fn setval_points_one_past_the_maximum() {
        let statement = setval_statement(&SEQUENCE_TARGETS[4]);
        assert_eq!(
            statement,
            "SELECT setval('employee_license_license_id_seq', \
             COALESCE((SELECT MAX(license_id) FROM employee_license), 0) + 1, false);"
        );
    }
}
