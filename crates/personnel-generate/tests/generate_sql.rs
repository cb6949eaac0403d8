use std::fs;
use std::path::{Path, PathBuf};

use personnel_generate::{GenerateOptions, GenerationEngine, GenerationError};

const TABLES: [&str; 6] = [
    "department",
    "position",
    "employee",
    "payroll",
    "employee_license",
    "oncall_shift",
];

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("personnel_generate_{label}_{}", uuid::Uuid::new_v4()));
    dir
}

fn options(out_dir: &Path, employees: u64) -> GenerateOptions {
    GenerateOptions {
        employees,
        out_dir: out_dir.to_path_buf(),
        seed: Some(11),
        ..GenerateOptions::default()
    }
}

fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_else(|_| panic!("missing {file}"))
}

fn statements(sql: &str, table: &str) -> usize {
    sql.matches(&format!("INSERT INTO {table} (")).count()
}

#[test]
fn run_writes_one_transaction_per_table() {
    let out_dir = temp_out_dir("tables");
    let result = GenerationEngine::new(options(&out_dir, 250))
        .run()
        .expect("run generation");

    for table in TABLES {
        let sql = read(&out_dir, &format!("{table}.sql"));
        assert!(sql.starts_with(&format!("-- {table}\nBEGIN;\n\n")), "{table}");
        assert!(sql.ends_with("COMMIT;\n"), "{table}");
        let report = result.report.table(table).expect("table report");
        assert_eq!(report.statements as usize, statements(&sql, table));
        assert_eq!(report.bytes, sql.len() as u64);
    }

    let counts = result.report.row_counts();
    assert_eq!(counts["department"], 12);
    assert_eq!(counts["position"], 30);
    assert_eq!(counts["employee"], 250);
    assert!(counts["payroll"] >= 250);
    assert!(counts["oncall_shift"] >= 250);

    let sequences = read(&out_dir, "set_sequences.sql");
    assert_eq!(sequences.matches("SELECT setval(").count(), 6);
    assert!(sequences.contains("'employee_employee_id_seq'"));
    assert_eq!(
        result.report.sequences_path.as_deref(),
        Some(out_dir.join("set_sequences.sql").as_path())
    );

    fs::remove_dir_all(&out_dir).expect("remove output");
}

#[test]
fn batches_are_bounded_by_batch_size() {
    let out_dir = temp_out_dir("batches");
    let options = GenerateOptions {
        batch_size: 10,
        ..options(&out_dir, 25)
    };
    let result = GenerationEngine::new(options).run().expect("run generation");

    let sql = read(&out_dir, "employee.sql");
    assert_eq!(statements(&sql, "employee"), 3);
    assert_eq!(result.report.table("employee").map(|t| t.statements), Some(3));
    assert_eq!(result.report.table("position").map(|t| t.statements), Some(3));
    assert!(!sql.contains(":00:"), "timestamps must not carry seconds");

    fs::remove_dir_all(&out_dir).expect("remove output");
}

#[test]
fn zero_employees_still_writes_reference_tables() {
    let out_dir = temp_out_dir("empty");
    let result = GenerationEngine::new(options(&out_dir, 0))
        .run()
        .expect("run generation");

    assert_eq!(statements(&read(&out_dir, "department.sql"), "department"), 1);
    assert_eq!(statements(&read(&out_dir, "position.sql"), "position"), 1);
    for table in ["employee", "payroll", "employee_license", "oncall_shift"] {
        let sql = read(&out_dir, &format!("{table}.sql"));
        assert_eq!(sql, format!("-- {table}\nBEGIN;\n\nCOMMIT;\n"));
    }
    assert!(out_dir.join("set_sequences.sql").exists());
    assert_eq!(result.report.row_counts()["employee"], 0);

    fs::remove_dir_all(&out_dir).expect("remove output");
}

#[test]
fn sequences_can_be_suppressed() {
    let out_dir = temp_out_dir("no_sequences");
    let options = GenerateOptions {
        write_sequences: false,
        ..options(&out_dir, 5)
    };
    let result = GenerationEngine::new(options).run().expect("run generation");

    assert!(result.report.sequences_path.is_none());
    assert!(!out_dir.join("set_sequences.sql").exists());
    assert!(out_dir.join("employee.sql").exists());

    fs::remove_dir_all(&out_dir).expect("remove output");
}

#[test]
fn exhausted_id_space_writes_nothing() {
    let out_dir = temp_out_dir("exhausted");
    let result = GenerationEngine::new(options(&out_dir, 900_000_001)).run();

    assert!(matches!(
        result,
        Err(GenerationError::Exhausted {
            requested: 900_000_001,
            available: 900_000_000
        })
    ));
    assert!(!out_dir.exists());
}

#[test]
fn unwritable_output_directory_fails() {
    let blocker = temp_out_dir("blocker");
    fs::write(&blocker, b"not a directory").expect("create blocker file");
    let result = GenerationEngine::new(options(&blocker.join("out"), 3)).run();

    assert!(matches!(result, Err(GenerationError::Destination { .. })));
    fs::remove_file(&blocker).expect("remove blocker file");
}

#[test]
fn same_seed_produces_identical_files() {
    let out_a = temp_out_dir("seed_a");
    let out_b = temp_out_dir("seed_b");
    GenerationEngine::new(options(&out_a, 120))
        .run()
        .expect("run generation A");
    GenerationEngine::new(options(&out_b, 120))
        .run()
        .expect("run generation B");

    for table in TABLES {
        let file = format!("{table}.sql");
        assert_eq!(read(&out_a, &file), read(&out_b, &file), "{file} differs");
    }

    fs::remove_dir_all(&out_a).expect("remove output A");
    fs::remove_dir_all(&out_b).expect("remove output B");
}
