mod logging;

use std::path::{Path, PathBuf};

use clap::Parser;
use personnel_generate::{GenerateOptions, GenerationEngine, GenerationError, GenerationResult};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("cannot read config '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "personnel-gen",
    version,
    about = "Generate personnel SQL files with explicit IDs"
)]
struct Cli {
    /// Number of employees to generate (default 100000).
    #[arg(short = 'n', long)]
    employees: Option<u64>,
    /// Output directory for the SQL files.
    #[arg(short = 'o', long)]
    outdir: Option<PathBuf>,
    /// Do not write set_sequences.sql.
    #[arg(long, default_value_t = false)]
    no_sequences: bool,
    /// Maximum rows per INSERT statement.
    #[arg(long)]
    batch_size: Option<usize>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with generation options; flags take precedence.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Write the JSON generation report to this path.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
    /// Append JSON logs to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_file.as_deref())?;

    let options = resolve_options(&cli)?;
    println!(
        "Generator starting with employees={}, outdir={}",
        options.employees,
        options.out_dir.display()
    );

    let result = GenerationEngine::new(options).run()?;
    print_summary(&result)?;

    if let Some(path) = &cli.report {
        std::fs::write(path, serde_json::to_vec_pretty(&result.report)?)?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(())
}

fn resolve_options(cli: &Cli) -> Result<GenerateOptions, CliError> {
    let mut options = match &cli.config {
        Some(path) => load_config(path)?,
        None => GenerateOptions::default(),
    };

    if let Some(employees) = cli.employees {
        options.employees = employees;
    }
    if let Some(outdir) = &cli.outdir {
        options.out_dir = outdir.clone();
    }
    if cli.no_sequences {
        options.write_sequences = false;
    }
    if let Some(batch_size) = cli.batch_size {
        options.batch_size = batch_size;
    }
    if let Some(seed) = cli.seed {
        options.seed = Some(seed);
    }

    Ok(options)
}

fn load_config(path: &Path) -> Result<GenerateOptions, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&contents)?)
}

fn print_summary(result: &GenerationResult) -> Result<(), CliError> {
    println!("Files written:");
    for table in &result.report.tables {
        println!(
            " - {}: {} ({} rows)",
            table.table,
            table.path.display(),
            table.rows
        );
    }
    if let Some(path) = &result.report.sequences_path {
        println!(" - sequences: {}", path.display());
    }
    println!(
        "Row counts: {}",
        serde_json::to_string_pretty(&result.report.row_counts())?
    );
    println!(
        "Done (seed {}). You can import the SQL files into PostgreSQL.",
        result.report.seed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "personnel-gen",
            "-n",
            "25",
            "-o",
            "out",
            "--no-sequences",
            "--seed",
            "3",
        ]);
        let options = resolve_options(&cli).expect("resolve options");
        assert_eq!(options.employees, 25);
        assert_eq!(options.out_dir, PathBuf::from("out"));
        assert!(!options.write_sequences);
        assert_eq!(options.seed, Some(3));
        assert_eq!(options.batch_size, 1000);
    }

    #[test]
    fn defaults_match_the_documented_cli() {
        let cli = Cli::parse_from(["personnel-gen"]);
        let options = resolve_options(&cli).expect("resolve options");
        assert_eq!(options.employees, 100_000);
        assert!(options.write_sequences);
        assert!(options.seed.is_none());
    }

    #[test]
    fn flags_win_over_config_file() {
        let path = std::env::temp_dir().join(format!(
            "personnel_cli_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "employees = 40\nbatch_size = 7\n").expect("write config");
        let cli = Cli::parse_from([
            "personnel-gen",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--employees",
            "9",
        ]);
        let options = resolve_options(&cli).expect("resolve options");
        assert_eq!(options.employees, 9);
        assert_eq!(options.batch_size, 7);
        std::fs::remove_file(&path).expect("remove config");
    }

    #[test]
    fn missing_config_is_reported() {
        let cli = Cli::parse_from(["personnel-gen", "--config", "/nonexistent/personnel.toml"]);
        assert!(matches!(
            resolve_options(&cli),
            Err(CliError::ConfigRead { .. })
        ));
    }
}
