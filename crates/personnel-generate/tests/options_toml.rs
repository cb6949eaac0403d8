use std::path::PathBuf;

use personnel_generate::{CountRange, GenerateOptions};

#[test]
fn partial_toml_keeps_defaults() {
    let options: GenerateOptions = toml::from_str(
        r#"
employees = 250
out_dir = "sql"
seed = 9

[payroll_per_employee]
min = 2
max = 4
"#,
    )
    .expect("parse options");

    assert_eq!(options.employees, 250);
    assert_eq!(options.out_dir, PathBuf::from("sql"));
    assert_eq!(options.seed, Some(9));
    assert_eq!(options.payroll_per_employee, CountRange::new(2, 4));
    assert_eq!(options.batch_size, 1000);
    assert_eq!(options.shifts_per_employee, CountRange::new(1, 5));
    assert!(options.write_sequences);
    options.validate().expect("valid options");
}

#[test]
fn inverted_range_fails_validation() {
    let options: GenerateOptions = toml::from_str(
        r#"
[licenses_per_employee]
min = 4
max = 2
"#,
    )
    .expect("parse options");

    assert!(options.validate().is_err());
}
